//! Bazaar operations through the `bzr` CLI.
//!
//! Branching (the Bazaar equivalent of a clone) goes through the CLI with
//! hardening rather than a protocol implementation: stdout and stderr are
//! captured, the exit status decides success, and failure text is taken from
//! stderr. The call blocks until the subprocess exits; no timeout is applied.

use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors returned by bzr operations.
#[derive(Error, Debug)]
pub enum BzrError {
    /// `bzr branch` exited non-zero; carries the captured stderr text.
    #[error("branch failed: {0}")]
    Branch(String),
    /// `bzr version` exited non-zero.
    #[error("version probe failed: {0}")]
    Version(String),
    /// A path argument is not representable for the CLI.
    #[error("failed to parse bzr data: {0}")]
    ParseError(String),
    /// Underlying IO error (typically: executable not found).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid inputs were provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Validate that a repository URL does not contain dangerous patterns.
///
/// Rejects:
/// - Empty strings
/// - Strings starting with `-` (could be interpreted as flags)
/// - Strings containing null bytes or control characters
fn validate_url(value: &str) -> Result<(), BzrError> {
    if value.is_empty() {
        return Err(BzrError::InvalidInput(
            "repository URL cannot be empty".to_string(),
        ));
    }
    if value.starts_with('-') {
        return Err(BzrError::InvalidInput(
            "repository URL cannot start with '-'".to_string(),
        ));
    }
    if value.bytes().any(|b| b == 0 || b < 0x20) {
        return Err(BzrError::InvalidInput(
            "repository URL cannot contain null or control characters".to_string(),
        ));
    }
    Ok(())
}

/// Bazaar CLI wrapper.
///
/// The program name is overridable so hosts with `bzr` (or the `brz`
/// successor) in a nonstandard place can point at it.
pub struct BzrCli {
    program: String,
}

impl Default for BzrCli {
    fn default() -> Self {
        Self::new()
    }
}

impl BzrCli {
    /// Create a new BzrCli instance using the system bzr.
    pub fn new() -> Self {
        Self {
            program: "bzr".into(),
        }
    }

    /// Create a BzrCli instance running a specific executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Create a hardened Command.
    ///
    /// Applies:
    /// - `BRZ_PROGRESS_BAR=none` / `BZR_PROGRESS_BAR=none` - no interactive progress
    /// - null stdin - disable prompts
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.env("BRZ_PROGRESS_BAR", "none");
        cmd.env("BZR_PROGRESS_BAR", "none");
        cmd.stdin(Stdio::null());
        cmd
    }

    /// Branch a remote repository into `dest`, full history included.
    ///
    /// `dest` need not exist; bzr creates it. Output streams are captured and
    /// on a non-zero exit the trimmed stderr text is returned in
    /// [`BzrError::Branch`].
    pub fn branch(&self, url: &str, dest: &Path) -> Result<(), BzrError> {
        // Validate input to prevent flag injection
        validate_url(url)?;

        let dest_str = dest.to_str().ok_or_else(|| {
            BzrError::ParseError("destination path is not valid UTF-8".to_string())
        })?;

        let output = self
            .command()
            .arg("branch")
            .arg(url)
            .arg(dest_str)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BzrError::Branch(stderr.trim().to_string()));
        }

        Ok(())
    }

    /// Probe the installed bzr version.
    ///
    /// Returns the first line of `bzr version` output, e.g.
    /// "Bazaar (bzr) 2.7.0".
    pub fn version(&self) -> Result<String, BzrError> {
        let output = self.command().arg("version").output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BzrError::Version(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}
