use std::ffi::OsStr;

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::{debug, warn};

use crate::application::ports::{ProcessLocator, ServerHandle};
use crate::error::ProcessError;

/// Longest process name Linux reports (`comm` is 16 bytes with the NUL).
const LINUX_COMM_MAX_LEN: usize = 15;

/// Scans the OS process table through `sysinfo`.
///
/// Names are compared exactly and case-sensitively against the process name
/// the OS reports (on Linux, the 15-byte `comm` value).
#[derive(Debug, Default)]
pub struct SysinfoLocator;

impl ProcessLocator for SysinfoLocator {
    type Handle = SysinfoServerHandle;

    fn find(&self, name: &str) -> Result<Self::Handle, ProcessError> {
        if cfg!(target_os = "linux") && exceeds_comm_len(name) {
            warn!(
                name,
                "Server name is longer than {} bytes; Linux truncates process names, so it cannot match",
                LINUX_COMM_MAX_LEN
            );
        }
        let mut system = System::new();
        system.refresh_processes_specifics(ProcessesToUpdate::All, true, ProcessRefreshKind::new());
        let wanted = OsStr::new(name);
        let pid = system
            .processes()
            .iter()
            .filter(|(_, process)| process.name() == wanted)
            .map(|(pid, _)| *pid)
            .min()
            .ok_or_else(|| ProcessError::ServerNotFound {
                name: name.to_owned(),
            })?;
        debug!(pid = pid.as_u32(), name, "Located server process");
        Ok(SysinfoServerHandle::new(pid))
    }
}

fn exceeds_comm_len(name: &str) -> bool {
    name.len() > LINUX_COMM_MAX_LEN
}

pub struct SysinfoServerHandle {
    pid: Pid,
    system: System,
}

impl SysinfoServerHandle {
    fn new(pid: Pid) -> Self {
        let mut handle = Self {
            pid,
            system: System::new(),
        };
        // First refresh only sets the baseline for the next delta.
        handle.refresh();
        handle
    }

    /// sysinfo only computes `cpu_usage` on a full-table refresh; refreshing
    /// just this PID leaves it at 0.
    fn refresh(&mut self) {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new().with_cpu(),
        );
    }
}

impl ServerHandle for SysinfoServerHandle {
    fn pid(&self) -> u32 {
        self.pid.as_u32()
    }

    fn cpu_percent(&mut self) -> Result<f64, ProcessError> {
        self.refresh();
        self.system
            .process(self.pid)
            .map(|process| f64::from(process.cpu_usage()))
            .ok_or(ProcessError::ServerGone {
                pid: self.pid.as_u32(),
            })
    }
}
