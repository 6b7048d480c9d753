//! Child process launcher with a deadline and bounded output capture.

use std::io::{self, Read};
#[cfg(unix)]
use std::os::unix::process::CommandExt as _;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

/// Bytes kept per stream; the rest is drained and counted.
pub const OUTPUT_LIMIT_BYTES: usize = 64 * 1024;

/// How long readers may keep draining once the child is gone.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{0}")]
    Spawn(#[source] io::Error),

    #[error("failed to wait for child: {0}")]
    Wait(#[source] io::Error),

    #[error("failed to kill timed out child: {0}")]
    Kill(#[source] io::Error),

    #[error("failed to read child output: {0}")]
    Read(#[source] io::Error),

    #[error("child output was not piped")]
    MissingPipe,

    #[error("output reader thread panicked")]
    ReaderPanicked,
}

/// Captured child process output.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub truncated: usize,
    pub timed_out: bool,
}

impl ProcessOutput {
    /// Stdout followed by stderr, lossily decoded.
    pub fn combined(&self) -> String {
        let mut out = String::from_utf8_lossy(&self.stdout).into_owned();
        out.push_str(&String::from_utf8_lossy(&self.stderr));
        if self.truncated > 0 {
            out.push_str(&format!("\n[output truncated {} bytes]\n", self.truncated));
        }
        out
    }
}

/// Run a command, killing it once `timeout` elapses.
///
/// Both pipes are drained on helper threads while the child runs so a chatty
/// child cannot block on a full pipe. On Unix the child leads its own process
/// group, and a timeout kills the whole group, so grandchildren holding the
/// pipes open cannot outlive the deadline.
#[instrument(skip_all, fields(timeout_ms = timeout.as_millis()))]
pub fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<ProcessOutput, ProcessError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    cmd.process_group(0);

    debug!("spawning child process");
    let deadline = Instant::now() + timeout;
    let mut child = cmd.spawn().map_err(ProcessError::Spawn)?;

    let stdout = child.stdout.take().ok_or(ProcessError::MissingPipe)?;
    let stderr = child.stderr.take().ok_or(ProcessError::MissingPipe)?;
    let stdout_rx = spawn_reader(stdout, output_limit_bytes);
    let stderr_rx = spawn_reader(stderr, output_limit_bytes);

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).map_err(ProcessError::Wait)? {
        Some(status) => status,
        None => {
            warn!(timeout = ?timeout, "command timed out, killing its process group");
            timed_out = true;
            kill_tree(&mut child).map_err(ProcessError::Kill)?;
            child.wait().map_err(ProcessError::Wait)?
        }
    };

    let pid = child.id();
    let (stdout, stdout_truncated) = collect_output(&stdout_rx, deadline, pid)?;
    let (stderr, stderr_truncated) = collect_output(&stderr_rx, deadline, pid)?;
    let truncated = stdout_truncated + stderr_truncated;
    if truncated > 0 {
        warn!(truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
        truncated,
        timed_out,
    })
}

type ReadResult = Result<(Vec<u8>, usize), ProcessError>;

fn spawn_reader<R: Read + Send + 'static>(reader: R, limit: usize) -> Receiver<ReadResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // the receiver is gone once the reader was abandoned
        let _ = tx.send(read_stream_limited(reader, limit));
    });
    rx
}

/// Wait for a reader until the deadline (plus [`DRAIN_GRACE`]).
///
/// A leftover process still holding the pipe past that point gets its group
/// killed; if the pipe stays open after another grace period the reader is
/// abandoned and the stream reported empty.
fn collect_output(rx: &Receiver<ReadResult>, deadline: Instant, pid: u32) -> ReadResult {
    let wait = deadline.saturating_duration_since(Instant::now()) + DRAIN_GRACE;
    match rx.recv_timeout(wait) {
        Ok(result) => return result,
        Err(RecvTimeoutError::Disconnected) => return Err(ProcessError::ReaderPanicked),
        Err(RecvTimeoutError::Timeout) => {}
    }

    warn!(pid, "output pipe held open by leftover processes, killing them");
    if let Err(e) = kill_group(pid) {
        warn!(pid, error = %e, "failed to kill leftover processes");
    }
    match rx.recv_timeout(DRAIN_GRACE) {
        Ok(result) => result,
        Err(RecvTimeoutError::Disconnected) => Err(ProcessError::ReaderPanicked),
        Err(RecvTimeoutError::Timeout) => {
            warn!(pid, "abandoning output reader");
            Ok((Vec::new(), 0))
        }
    }
}

#[cfg(unix)]
fn kill_tree(child: &mut Child) -> io::Result<()> {
    kill_group(child.id())
}

#[cfg(not(unix))]
fn kill_tree(child: &mut Child) -> io::Result<()> {
    child.kill()
}

/// SIGKILL every process in the group led by `pid`; an empty group is fine.
#[cfg(unix)]
fn kill_group(pid: u32) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    match signal::killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) -> io::Result<()> {
    Ok(())
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> ReadResult {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).map_err(ProcessError::Read)?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        let keep = n.min(remaining);
        buf.extend_from_slice(&chunk[..keep]);
        truncated += n - keep;
    }

    Ok((buf, truncated))
}
