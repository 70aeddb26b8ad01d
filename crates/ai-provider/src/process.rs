use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Provider, ProviderError, ProviderId, Result};

/// Environment variable that replaces the `claude` binary (tests, custom installs).
pub const BINARY_ENV: &str = "CLAUDE_INIT_CLAUDE_BIN";

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(15);

// ─── CliProvider ──────────────────────────────────────────────────────────

/// Drives the local `claude` binary in print mode, one process per prompt.
///
/// Stdout is the response. Stderr is captured and surfaced when the process
/// exits non-zero. The child is killed if it outlives the timeout.
pub struct CliProvider {
    binary: PathBuf,
    timeout: Duration,
}

impl CliProvider {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: ProviderId::Cli.descriptor().timeout,
        }
    }

    /// Use `$CLAUDE_INIT_CLAUDE_BIN` when set, else `claude` from `PATH`.
    pub fn from_env() -> Self {
        let binary = std::env::var_os(BINARY_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(ProviderId::Cli.descriptor().default_endpoint));
        Self::new(binary)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn build_command(&self, system_prompt: &str, user_message: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-p");
        if !system_prompt.is_empty() {
            cmd.arg("--system-prompt").arg(system_prompt);
        }
        cmd.arg(user_message);
        // Lets the binary run from inside an active Claude session too.
        cmd.env_remove("CLAUDECODE");
        cmd
    }

    async fn run(&self, mut cmd: Command, timeout: Duration) -> Result<Output> {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProviderError::NotInstalled,
            _ => ProviderError::Io(e),
        })?;

        tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| ProviderError::Timeout(timeout))?
            .map_err(ProviderError::Io)
    }

    /// Lowercased file stem of the binary, e.g. `claude`.
    fn binary_name(&self) -> String {
        self.binary
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Matches the exit error format of the child: code (or signal) plus stderr.
fn exit_error(output: &Output) -> ProviderError {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let status = match output.status.code() {
        Some(code) => format!("process exited with code {code}"),
        None => "process terminated by signal".to_string(),
    };
    if stderr.is_empty() {
        ProviderError::Process(status)
    } else {
        ProviderError::Process(format!("{status}\nStderr: {stderr}"))
    }
}

#[async_trait]
impl Provider for CliProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Cli
    }

    async fn send(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        tracing::debug!(
            binary = %self.binary.display(),
            prompt_bytes = user_message.len(),
            "invoking claude CLI"
        );
        let cmd = self.build_command(system_prompt, user_message);
        let output = self.run(cmd, self.timeout).await?;
        if !output.status.success() {
            return Err(exit_error(&output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn is_available(&self) -> Result<bool> {
        which::which(&self.binary).map_err(|_| ProviderError::NotInstalled)?;

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-v");
        let output = self.run(cmd, VERSION_PROBE_TIMEOUT).await?;

        let mut combined = String::from_utf8_lossy(&output.stdout).to_lowercase();
        combined.push_str(&String::from_utf8_lossy(&output.stderr).to_lowercase());
        Ok(combined.contains(&self.binary_name()))
    }
}
