
use serde_json::Value;
use tempfile::tempdir;

use support_sweep::{describe, jsonl_files, run_scalesweep, spawn_stand_in_server};

/// Prints three metric lines scaled by the level plus some noise.
const GENERATOR_SCRIPT: &str = r#"
echo "connecting to $1:$2 workload=$5"
i=0
while [ $i -lt 3 ]; do
  sleep 0.2
  echo "[METRICS] $(( $3 * 100 )) 2.5"
  i=$((i + 1))
done
echo "[METRICS] broken"
echo "done" >&2
"#;

#[cfg(unix)]
#[expect(clippy::float_arithmetic, reason = "tolerance check on exported means")]
fn close_to(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn e2e_missing_workload_is_usage_error() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_scalesweep(dir.path(), Vec::<String>::new())?;
    if output.status.success() {
        return Err(format!("expected failure\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("WORKLOAD") {
        return Err(format!("expected usage text\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_missing_server_exits_without_session() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let runs = dir.path().join("runs");
    let runs_arg = runs.to_string_lossy().into_owned();

    let output = run_scalesweep(
        dir.path(),
        [
            "workloada",
            "--server-name",
            "scalesweep-no-such-server",
            "--tracker",
            "jsonl",
            "--tracker-dir",
            runs_arg.as_str(),
        ],
    )?;
    if output.status.success() {
        return Err(format!("expected failure\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("scalesweep-no-such-server") {
        return Err(format!("expected server name in log\n{}", describe(&output)));
    }
    if !jsonl_files(&runs)?.is_empty() {
        return Err("no tracking session should be opened".to_owned());
    }
    Ok(())
}

#[cfg(unix)]
#[test]
fn e2e_sweep_exports_one_record_per_level() -> Result<(), String> {
    let server = spawn_stand_in_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let runs = dir.path().join("runs");
    let runs_arg = runs.to_string_lossy().into_owned();

    let output = run_scalesweep(
        dir.path(),
        [
            "workloadb",
            "--server-name",
            "sleep",
            "--generator",
            "/bin/sh",
            "--generator-arg",
            "-c",
            "--generator-arg",
            GENERATOR_SCRIPT,
            "--generator-arg",
            "gen",
            "--no-affinity",
            "--duration",
            "1",
            "--warmup",
            "0",
            "--cooldown",
            "0",
            "--levels",
            "1,2",
            "--project",
            "e2e",
            "--run-name",
            "sweep",
            "--tracker",
            "jsonl",
            "--tracker-dir",
            runs_arg.as_str(),
        ],
    )?;
    drop(server);
    if !output.status.success() {
        return Err(describe(&output));
    }

    let files = jsonl_files(&runs.join("e2e"))?;
    let [path] = files.as_slice() else {
        return Err(format!("expected one run file, found {:?}", files));
    };
    let content =
        std::fs::read_to_string(path).map_err(|err| format!("read run file failed: {}", err))?;
    let events = content
        .lines()
        .map(serde_json::from_str::<Value>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid jsonl: {}", err))?;

    let kinds: Vec<&str> = events
        .iter()
        .filter_map(|event| event.get("event").and_then(Value::as_str))
        .collect();
    if kinds != ["init", "define_metric", "log", "log", "finish"] {
        return Err(format!("unexpected event sequence: {:?}", kinds));
    }

    let logs: Vec<&Value> = events
        .iter()
        .filter(|event| event.get("event").and_then(Value::as_str) == Some("log"))
        .collect();
    for (log, (threads, throughput)) in logs.iter().zip([(1_u64, 100.0_f64), (2, 200.0)]) {
        let data = log
            .get("data")
            .ok_or_else(|| "log event without data".to_owned())?;
        if data.get("Threads").and_then(Value::as_u64) != Some(threads) {
            return Err(format!("unexpected threads in {}", data));
        }
        let reported = data
            .get("Throughput")
            .and_then(Value::as_f64)
            .ok_or_else(|| format!("missing throughput in {}", data))?;
        if !close_to(reported, throughput) {
            return Err(format!("unexpected throughput in {}", data));
        }
        let latency = data
            .get("Latency")
            .and_then(Value::as_f64)
            .ok_or_else(|| format!("missing latency in {}", data))?;
        if !close_to(latency, 2.5) {
            return Err(format!("unexpected latency in {}", data));
        }
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("connecting to 127.0.0.1:8080 workload=workloadb") {
        return Err(format!("generator output not echoed\n{}", describe(&output)));
    }
    Ok(())
}
