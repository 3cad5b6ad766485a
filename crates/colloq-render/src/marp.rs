//! Marp CLI subprocess renderer

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{ChildStderr, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{RenderError, RenderResult};
use crate::locator::RendererHandle;
use crate::renderer::{DocumentRenderer, RenderFormat};

/// Default time a single render may take
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long stderr is still collected once the renderer has exited.
/// Processes it spawned may keep the pipe open for much longer.
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Renders poster documents by running the Marp CLI
#[derive(Debug, Clone)]
pub struct MarpRenderer {
    handle: RendererHandle,
    timeout: Duration,
}

impl MarpRenderer {
    /// Create a renderer for a located Marp CLI
    pub fn new(handle: RendererHandle) -> Self {
        Self {
            handle,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-render timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The command prefix in use
    pub fn handle(&self) -> &RendererHandle {
        &self.handle
    }

    /// Full command for one render
    ///
    /// HTML tags stay enabled for both formats; the poster body is raw HTML.
    pub fn command(&self, source: &Path, output: &Path, format: RenderFormat) -> Command {
        let mut cmd = self.handle.command();
        cmd.arg(source).arg("-o").arg(output).arg("--html");
        if format == RenderFormat::Pdf {
            cmd.arg("--pdf");
        }
        cmd.arg("--allow-local-files");
        cmd
    }

    /// Run to completion or timeout, returning the exit status and stderr
    fn run(&self, mut cmd: Command) -> RenderResult<(ExitStatus, String)> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| RenderError::failed(format!("failed to start renderer: {}", e)))?;

        let stderr = drain_stderr(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RenderError::failed(format!(
                    "renderer timed out after {:.1}s\n{}",
                    self.timeout.as_secs_f64(),
                    collect_stderr(&stderr)
                )));
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok((status, collect_stderr(&stderr)))
    }
}

/// Read stderr off-thread so a chatty renderer can't fill the pipe
fn drain_stderr(pipe: Option<ChildStderr>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match pipe.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }
    rx
}

/// Gather captured stderr until the pipe closes or the grace period ends
fn collect_stderr(rx: &Receiver<Vec<u8>>) -> String {
    let deadline = Instant::now() + STDERR_GRACE;
    let mut captured = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(chunk) => captured.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!("stderr still open after renderer exit, not waiting");
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    String::from_utf8_lossy(&captured).into_owned()
}

impl DocumentRenderer for MarpRenderer {
    fn name(&self) -> &'static str {
        "marp"
    }

    fn render(&self, source: &Path, output: &Path, format: RenderFormat) -> RenderResult<PathBuf> {
        tracing::debug!(
            source = %source.display(),
            output = %output.display(),
            %format,
            "running {}",
            self.handle
        );
        // a run that writes nothing must not leave the last artifact in place
        match std::fs::remove_file(output) {
            Ok(()) => tracing::debug!(output = %output.display(), "removed previous artifact"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let started = Instant::now();
        let (status, stderr) = self.run(self.command(source, output, format))?;

        if !status.success() {
            tracing::warn!(%status, "renderer failed");
            let stderr = if stderr.trim().is_empty() {
                format!("renderer exited with {}", status)
            } else {
                stderr
            };
            return Err(RenderError::Failed { stderr });
        }

        let size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(RenderError::failed(format!(
                "renderer exited successfully but wrote no output to {}\n{}",
                output.display(),
                stderr
            )));
        }

        tracing::info!(
            output = %output.display(),
            bytes = size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "rendered {}",
            format
        );
        Ok(output.to_path_buf())
    }
}
