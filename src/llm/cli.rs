//! Plumbing shared by the CLI-backed providers: locating the binary,
//! bounding a run by a configurable timeout and collecting its output.
//!
//! Each provider builds its own argument list and maps [`CliFailure`] into
//! its own error type.

use std::env;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

/// Timeout applied when the environment does not override it (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Why a CLI run produced no usable output.
#[derive(Debug)]
pub enum CliFailure {
    NotInstalled,
    Spawn(std::io::Error),
    Timeout(u64),
    NonZeroExit { code: i32, stderr: String },
}

/// An external command-line tool with an env-configurable timeout.
#[derive(Debug, Clone, Copy)]
pub struct CliTool {
    binary: &'static str,
    timeout_env: &'static str,
}

impl CliTool {
    pub const fn new(binary: &'static str, timeout_env: &'static str) -> Self {
        Self {
            binary,
            timeout_env,
        }
    }

    /// Timeout read from the tool's env var, in seconds.
    ///
    /// Unset or empty means the default; anything that is not a
    /// non-negative integer is logged and also means the default.
    pub fn timeout(&self) -> Duration {
        let raw = env::var(self.timeout_env).ok();
        let secs = match raw.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_TIMEOUT_SECS,
            Some(value) => value.parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "Ignoring {}={:?}; using {}s",
                    self.timeout_env, value, DEFAULT_TIMEOUT_SECS
                );
                DEFAULT_TIMEOUT_SECS
            }),
        };
        Duration::from_secs(secs)
    }

    /// Succeeds when the binary is on PATH and answers `--version`.
    pub async fn ensure_installed(&self) -> Result<(), CliFailure> {
        which::which(self.binary).map_err(|_| CliFailure::NotInstalled)?;

        let status = Command::new(self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(CliFailure::Spawn)?;

        if status.success() {
            Ok(())
        } else {
            Err(CliFailure::NotInstalled)
        }
    }

    /// Run the tool with `args` and return stdout, lossily decoded.
    pub async fn run<I, S>(&self, args: I) -> Result<String, CliFailure>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.run_within(args, self.timeout()).await
    }

    async fn run_within<I, S>(&self, args: I, limit: Duration) -> Result<String, CliFailure>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        debug!("Running {} (timeout {}s)", self.binary, limit.as_secs());

        let mut cmd = Command::new(self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(limit, cmd.output())
            .await
            .map_err(|_| CliFailure::Timeout(limit.as_secs()))?
            .map_err(CliFailure::Spawn)?;

        if !output.status.success() {
            return Err(CliFailure::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
