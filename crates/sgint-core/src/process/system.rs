//! Process runner backed by the system shell

use std::io::Write;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

#[cfg(unix)]
use super::terminal::claim_foreground;
use super::terminal::ForegroundGuard;
use super::{ProcessRunner, ShellCommand, ShellResult, SPAWN_FAILED};

/// How privilege escalation is attempted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationConfig {
    /// Non-interactive credential check; must never prompt
    pub probe: String,

    /// Prefix that re-issues a command with elevated privileges
    pub prefix: String,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            probe: "sudo -n -v".to_string(),
            prefix: "sudo".to_string(),
        }
    }
}

/// Runs commands through `/bin/sh -c`
#[derive(Debug, Clone)]
pub struct SystemRunner {
    shell: String,
    elevation: ElevationConfig,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self {
            shell: "/bin/sh".to_string(),
            elevation: ElevationConfig::default(),
        }
    }

    pub fn with_elevation(mut self, elevation: ElevationConfig) -> Self {
        self.elevation = elevation;
        self
    }

    /// Shell invocation for `script`.
    ///
    /// stderr is redirected onto stdout inside the shell, so both streams
    /// share one pipe and arrive in the order the child wrote them.
    fn command(&self, script: &str, command: &ShellCommand) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(format!("exec 2>&1\n{script}"));
        if let Some(dir) = command.cwd() {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Whether cached credentials allow elevation without a prompt.
    ///
    /// `None` when the probe itself could not be spawned.
    async fn probe_credentials(&self) -> Option<bool> {
        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(&self.elevation.probe)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) => {
                debug!(success = status.success(), "credential probe finished");
                Some(status.success())
            }
            Err(e) => {
                warn!(error = %e, probe = %self.elevation.probe, "failed to spawn credential probe");
                None
            }
        }
    }

    async fn run_plain<F>(&self, command: &ShellCommand, sink: F) -> i32
    where
        F: FnMut(&str) + Send,
    {
        debug!(command = %command, "spawning");
        let child = match self.command(command.script(), command).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(command = %command, error = %e, "failed to spawn");
                return SPAWN_FAILED;
            }
        };
        drain(child, sink).await
    }

    /// Re-issue the command through the elevation prefix with the terminal
    /// handed to the child so it can prompt for a password.
    ///
    /// The handoff happens in the child before exec. If it fails the spawn
    /// fails and the command never runs.
    async fn run_prompting<F>(&self, command: &ShellCommand, sink: F) -> i32
    where
        F: FnMut(&str) + Send,
    {
        let guard = match ForegroundGuard::capture() {
            Ok(guard) => guard,
            Err(e) => {
                warn!(error = %e, "no terminal to prompt for credentials on");
                return SPAWN_FAILED;
            }
        };

        let script = format!("{} {}", self.elevation.prefix, command.script());
        debug!(command = %command, "spawning elevated");

        let mut cmd = self.command(&script, command);
        // SAFETY: the hook only makes async-signal-safe libc calls
        #[cfg(unix)]
        unsafe {
            cmd.pre_exec(claim_foreground);
        }

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(command = %command, error = %e, "failed to spawn elevated command");
                return SPAWN_FAILED;
            }
        };

        let code = drain(child, sink).await;
        drop(guard);
        code
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    #[instrument(skip_all, fields(command = %command))]
    async fn run_streaming(&self, command: &ShellCommand) -> i32 {
        let code = self.run_plain(command, print_chunk).await;
        debug!(exit_code = code, "command finished");
        code
    }

    #[instrument(skip_all, fields(command = %command))]
    async fn run_captured(&self, command: &ShellCommand) -> ShellResult {
        let mut output = String::new();
        let code = self.run_plain(command, |chunk| output.push_str(chunk)).await;
        debug!(exit_code = code, bytes = output.len(), "command finished");
        ShellResult::new(output, code)
    }

    // The probe only avoids a needless password prompt. Credentials may
    // expire between the probe and the real command.
    #[instrument(skip_all, fields(command = %command))]
    async fn run_elevated(&self, command: &ShellCommand) -> i32 {
        match self.probe_credentials().await {
            None => SPAWN_FAILED,
            Some(true) => self.run_streaming(command).await,
            Some(false) => self.run_prompting(command, print_chunk).await,
        }
    }

    #[instrument(skip_all, fields(command = %command))]
    async fn run_elevated_captured(&self, command: &ShellCommand) -> ShellResult {
        match self.probe_credentials().await {
            None => ShellResult::spawn_failed(),
            Some(true) => self.run_captured(command).await,
            Some(false) => {
                let mut output = String::new();
                let code = self
                    .run_prompting(command, |chunk| output.push_str(chunk))
                    .await;
                ShellResult::new(output, code)
            }
        }
    }
}

/// Forward the child's combined output to `sink` until the pipe closes,
/// then wait for it to exit.
///
/// The pipe is read on its own task so the child never blocks on a full
/// pipe buffer. Chunks are whole lines including their terminator; the last
/// chunk may lack one.
async fn drain<F>(mut child: Child, mut sink: F) -> i32
where
    F: FnMut(&str) + Send,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let reader = child.stdout.take().map(|s| spawn_reader(s, tx));

    while let Some(chunk) = rx.recv().await {
        sink(&chunk);
    }

    if let Some(reader) = reader {
        if let Err(e) = reader.await {
            warn!(error = %e, "output reader task failed");
        }
    }

    match child.wait().await {
        Ok(status) => exit_code(status),
        Err(e) => {
            warn!(error = %e, "failed to wait for child");
            SPAWN_FAILED
        }
    }
}

fn spawn_reader<R>(stream: R, tx: mpsc::UnboundedSender<String>) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(String::from_utf8_lossy(&buf).into_owned()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "output stream closed with error");
                    break;
                }
            }
        }
    })
}

fn print_chunk(chunk: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(chunk.as_bytes());
    if !chunk.ends_with('\n') {
        let _ = stdout.write_all(b"\n");
    }
    let _ = stdout.flush();
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    SPAWN_FAILED
}
