use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, warn};

use super::{signal, CommandStatus, ProcessError};

#[derive(Debug, Clone)]
pub struct BackgroundJob {
    pub id: usize,
    pub pid: Pid,
    pub command: String,
    pub started: Instant,
}

#[derive(Debug, Clone)]
pub struct FinishedJob {
    pub job: BackgroundJob,
    pub status: CommandStatus,
    pub elapsed: Duration,
}

impl fmt::Display for FinishedJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:<10} {} ({:.1}s)",
            self.job.id,
            self.status.to_string(),
            self.job.command.trim(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Background children launched by the shell that have not been reaped yet.
///
/// Reaping only ever waits on pids in the table, with `WNOHANG`, so it never
/// blocks the prompt and never steals a foreground child's status.
#[derive(Debug)]
pub struct JobTable {
    jobs: Vec<BackgroundJob>,
    next_id: usize,
    reap_pending: Arc<AtomicBool>,
    signal_driven: bool,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            next_id: 1,
            reap_pending: Arc::new(AtomicBool::new(false)),
            signal_driven: false,
        }
    }

    /// Registers a SIGCHLD handler so `poll` only scans the table after a
    /// child has changed state. Without it, `poll` scans every time.
    pub fn watch_sigchld(&mut self) -> Result<(), ProcessError> {
        signal::watch_children(Arc::clone(&self.reap_pending))?;
        self.signal_driven = true;
        Ok(())
    }

    pub fn track(&mut self, pid: Pid, command: &str) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        debug!("tracking background job [{}] pid {}: {}", id, pid, command);
        self.jobs.push(BackgroundJob {
            id,
            pid,
            command: command.to_string(),
            started: Instant::now(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn jobs(&self) -> &[BackgroundJob] {
        &self.jobs
    }

    pub fn poll(&mut self) -> Vec<FinishedJob> {
        if self.jobs.is_empty() {
            return Vec::new();
        }
        if self.signal_driven && !self.reap_pending.swap(false, Ordering::SeqCst) {
            return Vec::new();
        }
        self.reap()
    }

    /// Collects every tracked child that has terminated.
    pub fn reap(&mut self) -> Vec<FinishedJob> {
        let mut finished = Vec::new();
        let mut index = 0;

        while index < self.jobs.len() {
            let pid = self.jobs[index].pid;
            let status = match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(_, code)) => CommandStatus::Exited(code),
                Ok(WaitStatus::Signaled(_, signal, _)) => CommandStatus::Signaled(signal),
                Ok(WaitStatus::StillAlive) | Err(Errno::EINTR) => {
                    index += 1;
                    continue;
                }
                Ok(other) => {
                    debug!("ignoring wait event {:?} for pid {}", other, pid);
                    index += 1;
                    continue;
                }
                Err(e) => {
                    // ECHILD: someone else already collected it
                    warn!("dropping background job pid {}: {}", pid, e);
                    self.jobs.remove(index);
                    continue;
                }
            };

            let job = self.jobs.remove(index);
            debug!("reaped background job [{}] pid {}: {:?}", job.id, pid, status);
            finished.push(FinishedJob {
                elapsed: job.started.elapsed(),
                job,
                status,
            });
        }

        finished
    }
}
