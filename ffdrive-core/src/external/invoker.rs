// ============================================================================
// ffdrive-core/src/external/invoker.rs
// ============================================================================
//
// FFMPEG INVOKER: Runs an assembled command line and captures stderr
//
// The command line is split with shell word rules and spawned directly, never
// through a shell. stdout and stdin are detached; stderr is drained on a
// reader thread so a chatty ffmpeg cannot block on a full pipe while we wait.
//
// With a timeout configured, the child is polled with `try_wait` and killed
// once the limit passes.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, warn};

use crate::command::escape;
use crate::error::{CoreError, CoreResult, command_start_error};

use super::history::DiagnosticHistory;
use super::{ToolInvoker, ToolOutput};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// [`ToolInvoker`] backed by `std::process`.
#[derive(Debug, Clone)]
pub struct FfmpegInvoker {
    program: PathBuf,
    timeout: Option<Duration>,
    history: Arc<DiagnosticHistory>,
}

impl FfmpegInvoker {
    pub fn new(program: impl Into<PathBuf>, history: Arc<DiagnosticHistory>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
            history,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn history(&self) -> &Arc<DiagnosticHistory> {
        &self.history
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn wait(&self, child: &mut Child) -> CoreResult<ExitStatus> {
        let Some(limit) = self.timeout else {
            return Ok(child.wait()?);
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if started.elapsed() >= limit {
                warn!(
                    "{} exceeded its {}s time limit; killing it",
                    self.program_name(),
                    limit.as_secs()
                );
                if let Err(e) = child.kill() {
                    warn!("Failed to kill timed-out process: {e}");
                }
                // Reap the child so it does not linger as a zombie.
                let _ = child.wait();
                return Err(CoreError::Timeout { limit });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl ToolInvoker for FfmpegInvoker {
    fn invoke(&self, command_line: &str, working_dir: Option<&Path>) -> CoreResult<ToolOutput> {
        let args = escape::split(command_line)?;
        debug!("Running: {} {}", self.program.display(), command_line);

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|e| command_start_error(&self.program_name(), e))?;

        let mut stderr = child.stderr.take().ok_or_else(|| {
            CoreError::CommandStart(
                self.program_name(),
                std::io::Error::other("stderr was not captured"),
            )
        })?;
        let reader = thread::spawn(move || read_diagnostics(&mut stderr));

        let status = self.wait(&mut child);
        let diagnostics = reader.join().unwrap_or_default();
        self.history.push(diagnostics.clone());
        let status = status?;

        let output = ToolOutput {
            diagnostics,
            exit_code: status.code(),
        };
        if !output.success() {
            error!(
                "{} exited with {:?}",
                self.program_name(),
                output.exit_code
            );
        }
        Ok(output)
    }
}

/// Drains `reader` to text. A read error is logged and whatever arrived
/// before it is kept.
fn read_diagnostics(reader: &mut impl Read) -> String {
    let mut buffer = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buffer) {
        warn!("Failed to read ffmpeg diagnostics after {} bytes: {e}", buffer.len());
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-ffmpeg.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_captures_stderr_and_exit_code() {
        let tmp = tempdir().unwrap();
        let program = script(tmp.path(), "echo \"args: $1 $2\" >&2\nexit 3");
        let history = Arc::new(DiagnosticHistory::new(5));
        let invoker = FfmpegInvoker::new(program, Arc::clone(&history));

        let output = invoker.invoke("-i \"my clip.mp4\"", None).unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
        assert_eq!(output.diagnostics.trim(), "args: -i my clip.mp4");
        assert_eq!(history.latest(), Some(output.diagnostics));
    }

    /// Yields `data` once, then fails.
    struct BrokenPipe<'a> {
        data: Option<&'a [u8]>,
    }

    impl Read for BrokenPipe<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.data.take() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                None => Err(std::io::Error::other("pipe closed")),
            }
        }
    }

    #[test]
    fn test_read_error_keeps_partial_diagnostics() {
        let mut pipe = BrokenPipe {
            data: Some(b"Stream mapping:"),
        };
        assert_eq!(read_diagnostics(&mut pipe), "Stream mapping:");
    }

    #[test]
    fn test_missing_program_is_dependency_error() {
        let tmp = tempdir().unwrap();
        let invoker = FfmpegInvoker::new(tmp.path().join("nope"), Arc::default());
        let err = invoker.invoke("-version", None).unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(_)));
    }

    #[test]
    fn test_timeout_kills_process() {
        let tmp = tempdir().unwrap();
        let program = script(tmp.path(), "exec sleep 5");
        let invoker = FfmpegInvoker::new(program, Arc::default())
            .with_timeout(Some(Duration::from_millis(200)));

        let started = Instant::now();
        let err = invoker.invoke("", None).unwrap_err();
        assert!(matches!(err, CoreError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_runs_in_working_dir() {
        let tmp = tempdir().unwrap();
        let program = script(tmp.path(), "pwd >&2");
        let invoker = FfmpegInvoker::new(program, Arc::default());
        let output = invoker.invoke("", Some(tmp.path())).unwrap();
        let reported = PathBuf::from(output.diagnostics.trim());
        assert_eq!(
            fs::canonicalize(reported).unwrap(),
            fs::canonicalize(tmp.path()).unwrap()
        );
    }
}
