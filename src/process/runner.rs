use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::command::{GeneratorCommand, GeneratorSettings};
use crate::application::ports::{ChildProcessRunner, LineStream};
use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, ProcessError};

const LINE_CHANNEL_CAPACITY: usize = 1024;

type LineResult = Result<String, ProcessError>;

/// Spawns the external load generator once per level.
pub struct LoadGeneratorRunner {
    settings: GeneratorSettings,
}

impl LoadGeneratorRunner {
    #[must_use]
    pub const fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }
}

impl ChildProcessRunner for LoadGeneratorRunner {
    type Stream = ChildLineStream;

    fn start(&mut self, level: u32, config: &RunConfig) -> AppResult<Self::Stream> {
        let command = GeneratorCommand::build(&self.settings, level, config);
        info!("Launching: {}", command.display());

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let (line_tx, line_rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
        let (child, readers) = spawn_with_output(process, &command.program, line_tx)?;

        Ok(ChildLineStream {
            child: Some(child),
            lines: line_rx,
            readers,
            echo: self.settings.echo_output,
        })
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> AppError {
    AppError::process(ProcessError::Spawn {
        program: program.to_owned(),
        source: err,
    })
}

/// stdout and stderr share one pipe, so lines keep the order the child wrote
/// them in.
#[cfg(unix)]
fn spawn_with_output(
    mut process: Command,
    program: &str,
    line_tx: mpsc::Sender<LineResult>,
) -> AppResult<(Child, Vec<JoinHandle<()>>)> {
    use std::os::fd::OwnedFd;
    use tokio::net::unix::pipe::Receiver;

    let pipe_error = |err| AppError::process(ProcessError::Pipe { source: err });
    let (reader, writer) = std::io::pipe().map_err(pipe_error)?;
    let stderr_writer = writer.try_clone().map_err(pipe_error)?;
    process.stdout(writer).stderr(stderr_writer);

    let spawned = process.spawn();
    // Closes the parent's write ends; EOF depends on it.
    drop(process);
    let child = spawned.map_err(|err| spawn_error(program, err))?;

    let output = Receiver::from_owned_fd(OwnedFd::from(reader)).map_err(pipe_error)?;
    Ok((child, vec![spawn_pipe_reader("output", output, line_tx)]))
}

#[cfg(not(unix))]
fn spawn_with_output(
    mut process: Command,
    program: &str,
    line_tx: mpsc::Sender<LineResult>,
) -> AppResult<(Child, Vec<JoinHandle<()>>)> {
    let mut child = process
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| spawn_error(program, err))?;
    let stdout = child
        .stdout
        .take()
        .ok_or(ProcessError::MissingPipe { stream: "stdout" })?;
    let stderr = child
        .stderr
        .take()
        .ok_or(ProcessError::MissingPipe { stream: "stderr" })?;
    let readers = vec![
        spawn_pipe_reader("stdout", stdout, line_tx.clone()),
        spawn_pipe_reader("stderr", stderr, line_tx),
    ];
    Ok((child, readers))
}

/// Combined stdout/stderr of one generator run.
///
/// Ends once the output pipe hits EOF; the child is then reaped and a failing
/// exit status is logged.
pub struct ChildLineStream {
    child: Option<Child>,
    lines: mpsc::Receiver<LineResult>,
    readers: Vec<JoinHandle<()>>,
    echo: bool,
}

#[async_trait]
impl LineStream for ChildLineStream {
    async fn next_line(&mut self) -> AppResult<Option<String>> {
        match self.lines.recv().await {
            Some(Ok(line)) => {
                if self.echo {
                    println!("{}", line);
                }
                Ok(Some(line))
            }
            Some(Err(err)) => Err(AppError::process(err)),
            None => {
                self.reap().await?;
                Ok(None)
            }
        }
    }
}

impl ChildLineStream {
    async fn reap(&mut self) -> AppResult<()> {
        for reader in self.readers.drain(..) {
            reader.await?;
        }
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .await
            .map_err(|err| AppError::process(ProcessError::Wait { source: err }))?;
        if status.success() {
            debug!(%status, "Load generator exited");
        } else {
            warn!(%status, "Load generator exited with failure");
        }
        Ok(())
    }
}

fn spawn_pipe_reader<R>(
    stream: &'static str,
    pipe: R,
    line_tx: mpsc::Sender<LineResult>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let item = match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => Ok(decode_line(&buf)),
                Err(err) => Err(ProcessError::Read {
                    stream,
                    source: err,
                }),
            };
            let failed = item.is_err();
            if line_tx.send(item).await.is_err() || failed {
                break;
            }
        }
    })
}

/// Output is not guaranteed to be UTF-8; invalid bytes are replaced.
fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\n', '\r'])
        .to_owned()
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::RunConfigParts;

    fn config() -> AppResult<RunConfig> {
        Ok(RunConfig::new(RunConfigParts {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            duration: Duration::from_secs(1),
            warmup: Duration::ZERO,
            levels: vec![4],
            workload: "scan".to_owned(),
            cooldown: Duration::ZERO,
        })?)
    }

    // `sh -c <script> gen <host> <port> <level> <secs> <workload>` exposes the
    // generator arguments to the script as $1..$5.
    fn shell_runner(script: &str) -> LoadGeneratorRunner {
        LoadGeneratorRunner::new(GeneratorSettings {
            program: "/bin/sh".to_owned(),
            program_args: vec!["-c".to_owned(), script.to_owned(), "gen".to_owned()],
            cpu_affinity: None,
            echo_output: false,
        })
    }

    async fn collect(stream: &mut ChildLineStream) -> AppResult<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = stream.next_line().await? {
            lines.push(line);
        }
        Ok(lines)
    }

    #[tokio::test]
    async fn streams_stdout_lines_in_order() -> AppResult<()> {
        let script = "echo \"args $1 $2 $3 $4 $5\"; echo '[METRICS] 10.0 1.5 0'; printf 'tail'";
        let mut runner = shell_runner(script);
        let mut stream = runner.start(4, &config()?)?;
        let lines = collect(&mut stream).await?;
        assert_eq!(
            lines,
            ["args 127.0.0.1 8080 4 1 scan", "[METRICS] 10.0 1.5 0", "tail"]
        );
        assert_eq!(stream.next_line().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn merges_stderr_and_survives_failing_exit() -> AppResult<()> {
        let mut runner = shell_runner("echo out; echo err 1>&2; echo again; exit 3");
        let mut stream = runner.start(4, &config()?)?;
        let lines = collect(&mut stream).await?;
        assert_eq!(lines, ["out", "err", "again"]);
        Ok(())
    }

    #[tokio::test]
    async fn interleaved_stdout_and_stderr_keep_emission_order() -> AppResult<()> {
        let script = "i=0; while [ $i -lt 400 ]; do \
            if [ $((i % 2)) -eq 0 ]; then echo $i; else echo $i 1>&2; fi; \
            i=$((i + 1)); done";
        let mut runner = shell_runner(script);
        let mut stream = runner.start(4, &config()?)?;
        let lines = collect(&mut stream).await?;
        let expected: Vec<String> = (0..400).map(|idx: u32| idx.to_string()).collect();
        assert_eq!(lines, expected);
        Ok(())
    }

    #[tokio::test]
    async fn missing_executable_fails_to_spawn() -> AppResult<()> {
        let mut runner = LoadGeneratorRunner::new(GeneratorSettings {
            program: "./definitely-not-a-load-generator".to_owned(),
            program_args: Vec::new(),
            cpu_affinity: None,
            echo_output: false,
        });
        match runner.start(1, &config()?) {
            Err(AppError::Process(ProcessError::Spawn { program, .. })) => {
                assert_eq!(program, "./definitely-not-a-load-generator");
                Ok(())
            }
            Err(err) => Err(format!("unexpected error: {}", err).into()),
            Ok(_) => Err("spawn should fail".into()),
        }
    }
}
