use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Message reported when a command exceeds its timeout.
pub const TIMEOUT_MESSAGE: &str = "Command timed out";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to wait for output after the command exits. A helper the command
/// left running (ssh, a credential cache) can hold the pipe open past that.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Normalized outcome of one backend invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Trimmed stdout, only when the command succeeded.
    pub fn trimmed_stdout(&self) -> Option<&str> {
        self.success.then(|| self.stdout.trim())
    }
}

/// Executes backend commands against one working copy.
///
/// Implementations must never panic or return an error: every failure
/// (spawn error, non-zero exit, timeout) is folded into a [`CommandOutput`].
pub trait CommandRunner: Send + Sync {
    fn execute(&self, args: &[&str], timeout: Duration) -> CommandOutput;
}

impl<R: CommandRunner + ?Sized> CommandRunner for Arc<R> {
    fn execute(&self, args: &[&str], timeout: Duration) -> CommandOutput {
        (**self).execute(args, timeout)
    }
}

/// Runs the git command-line binary as a subprocess.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(binary: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn spawn(&self, args: &[&str]) -> std::io::Result<Child> {
        Command::new(&self.binary)
            .args(args)
            .current_dir(&self.workdir)
            // Never block on an interactive credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
    }
}

impl CommandRunner for GitCli {
    fn execute(&self, args: &[&str], timeout: Duration) -> CommandOutput {
        let started = Instant::now();
        let mut child = match self.spawn(args) {
            Ok(child) => child,
            Err(_) if !self.workdir.is_dir() => {
                return CommandOutput::failed(format!(
                    "Working directory not found: {}",
                    self.workdir.display()
                ));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(binary = %self.binary, "backend binary not found");
                return CommandOutput::failed(format!(
                    "{} not found. Please install it.",
                    self.binary
                ));
            }
            Err(e) => return CommandOutput::failed(e.to_string()),
        };

        // Drain pipes concurrently; a full pipe buffer blocks the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!(?args, timeout_secs = timeout.as_secs(), "git command timed out");
                    return CommandOutput::failed(TIMEOUT_MESSAGE);
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return CommandOutput::failed(e.to_string());
                }
            }
        };

        let output = CommandOutput {
            success: status.success(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        };
        debug!(
            ?args,
            code = ?status.code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "git command finished"
        );
        output
    }
}

/// Output captured from one pipe by a background reader.
struct Drained {
    buf: Arc<Mutex<Vec<u8>>>,
    done: Receiver<()>,
}

/// Read `pipe` on its own thread until EOF.
///
/// The reader is never joined. If a grandchild keeps the pipe open, the
/// thread stays blocked until that process exits; killing the child only
/// reaches git itself.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Drained> {
    pipe.map(|mut pipe| {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();
        let shared = Arc::clone(&buf);
        thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match pipe.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => match shared.lock() {
                        Ok(mut out) => out.extend_from_slice(&chunk[..n]),
                        Err(_) => break,
                    },
                }
            }
            let _ = tx.send(());
        });
        Drained { buf, done }
    })
}

/// Whatever the reader captured, waiting at most [`DRAIN_GRACE`] for EOF.
fn collect(drained: Option<Drained>) -> String {
    let Some(drained) = drained else {
        return String::new();
    };
    let _ = drained.done.recv_timeout(DRAIN_GRACE);
    drained
        .buf
        .lock()
        .map(|out| String::from_utf8_lossy(&out).into_owned())
        .unwrap_or_default()
}
