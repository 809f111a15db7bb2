use std::time::Duration;

use crate::domain::RunConfig;

/// CPU pinning helper the generator is launched through.
pub const TASKSET_BIN: &str = "taskset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub program: String,
    /// Placed right after `program`, before the level arguments, for
    /// generators launched through an interpreter or wrapper.
    pub program_args: Vec<String>,
    /// Core list handed to `taskset -c`, e.g. `2-4`. `None` runs unpinned.
    pub cpu_affinity: Option<String>,
    pub echo_output: bool,
}

/// Fully resolved invocation of the load generator for one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl GeneratorCommand {
    /// `[taskset -c <cores>] <generator> [program args] <host> <port> <level> <secs> <workload>`
    #[must_use]
    pub fn build(settings: &GeneratorSettings, level: u32, config: &RunConfig) -> Self {
        let mut args = Vec::with_capacity(settings.program_args.len().saturating_add(8));
        let program = match settings.cpu_affinity.as_deref() {
            Some(cores) => {
                args.push("-c".to_owned());
                args.push(cores.to_owned());
                args.push(settings.program.clone());
                TASKSET_BIN.to_owned()
            }
            None => settings.program.clone(),
        };
        args.extend(settings.program_args.iter().cloned());
        args.push(config.host().to_owned());
        args.push(config.port().to_string());
        args.push(level.to_string());
        args.push(whole_seconds(config.duration()).to_string());
        args.push(config.workload().to_owned());
        Self { program, args }
    }

    #[must_use]
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

/// The generator only takes whole seconds; partial seconds round up.
fn whole_seconds(duration: Duration) -> u64 {
    duration
        .as_secs()
        .saturating_add(u64::from(duration.subsec_nanos() > 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RunConfigParts;
    use crate::error::AppResult;

    fn config(duration: Duration) -> AppResult<RunConfig> {
        Ok(RunConfig::new(RunConfigParts {
            host: "10.0.0.7".to_owned(),
            port: 9000,
            duration,
            warmup: Duration::from_secs(1),
            levels: vec![1, 30],
            workload: "mixed".to_owned(),
            cooldown: Duration::ZERO,
        })?)
    }

    #[test]
    fn pinned_command_prefixes_taskset() -> AppResult<()> {
        let settings = GeneratorSettings {
            program: "./load_generator".to_owned(),
            program_args: Vec::new(),
            cpu_affinity: Some("2-4".to_owned()),
            echo_output: true,
        };
        let command = GeneratorCommand::build(&settings, 30, &config(Duration::from_secs(300))?);
        assert_eq!(command.program, TASKSET_BIN);
        assert_eq!(
            command.args,
            [
                "-c",
                "2-4",
                "./load_generator",
                "10.0.0.7",
                "9000",
                "30",
                "300",
                "mixed"
            ]
        );
        assert_eq!(
            command.display(),
            "taskset -c 2-4 ./load_generator 10.0.0.7 9000 30 300 mixed"
        );
        Ok(())
    }

    #[test]
    fn unpinned_command_runs_generator_directly() -> AppResult<()> {
        let settings = GeneratorSettings {
            program: "python3".to_owned(),
            program_args: vec!["bench/gen.py".to_owned()],
            cpu_affinity: None,
            echo_output: false,
        };
        let command = GeneratorCommand::build(&settings, 1, &config(Duration::from_millis(1500))?);
        assert_eq!(command.program, "python3");
        assert_eq!(
            command.args,
            ["bench/gen.py", "10.0.0.7", "9000", "1", "2", "mixed"]
        );
        Ok(())
    }
}
