//! The Bazaar data source adapter.
//!
//! Implements the fetch contract a host ingestion pipeline drives
//! heterogeneous repository adapters through: ensure the target directory
//! exists, run `bzr branch`, log the outcome.

use std::path::Path;

use thiserror::Error;

use crate::bzr::{BzrCli, BzrError};
use crate::metadata::{self, ConnectionData};
use crate::params::{ParamError, SourceParams, REPO_URL, TARGET_DIRECTORY};

/// Errors that abort a fetch.
///
/// A failed `bzr branch` is deliberately not represented here; see
/// [`DataSource::fetch`] on [`BazaarSource`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// A required configuration key is absent.
    #[error(transparent)]
    MissingParam(#[from] ParamError),
    /// The target directory could not be created.
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Contract between the host orchestrator and a repository adapter.
pub trait DataSource {
    /// Name the host registered this source under.
    fn name(&self) -> &str;

    /// Fetch the configured repository into the target directory.
    fn fetch(&self) -> Result<(), FetchError>;

    /// SVG icon markup for the host UI.
    fn icon(&self) -> String;

    /// Connection type and ordered configuration fields.
    fn connection_data(&self) -> ConnectionData;
}

/// Fetches Bazaar repositories by shelling out to `bzr branch`.
pub struct BazaarSource {
    name: String,
    session: Option<String>,
    dependencies: Vec<String>,
    subscribers: Vec<String>,
    params: SourceParams,
    bzr: BzrCli,
}

impl BazaarSource {
    /// Create a source with the given registration name and parameters.
    pub fn new(name: impl Into<String>, params: SourceParams) -> Self {
        Self {
            name: name.into(),
            session: None,
            dependencies: Vec::new(),
            subscribers: Vec::new(),
            params,
            bzr: BzrCli::new(),
        }
    }

    /// Attach the host session handle.
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Name other sources this one depends on.
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Name subscribers the host notifies about this source.
    pub fn with_subscribers(mut self, subscribers: Vec<String>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Use a specific bzr CLI instance (nonstandard executable location).
    pub fn with_bzr(mut self, bzr: BzrCli) -> Self {
        self.bzr = bzr;
        self
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn subscribers(&self) -> &[String] {
        &self.subscribers
    }

    pub fn params(&self) -> &SourceParams {
        &self.params
    }
}

impl DataSource for BazaarSource {
    fn name(&self) -> &str {
        &self.name
    }

    /// Fetch the configured repository into the target directory.
    ///
    /// Only missing parameters and directory-creation failures are returned
    /// as errors. A failing `bzr branch` is logged and swallowed: the call
    /// returns `Ok(())` and callers that need to react must inspect the logs
    /// or verify the target directory holds a working copy. Hosts depend on
    /// this non-raising contract; do not tighten it.
    fn fetch(&self) -> Result<(), FetchError> {
        let repo_url = self.params.require(REPO_URL)?;
        let target_directory = self.params.require(TARGET_DIRECTORY)?;

        log::info!(
            "Starting fetch of Bazaar repository '{}' into directory '{}'",
            repo_url,
            target_directory
        );

        let target = Path::new(target_directory);
        if !target.exists() {
            if let Err(e) = std::fs::create_dir_all(target) {
                log::error!("Failed to create directory '{}': {}", target_directory, e);
                return Err(FetchError::CreateDir {
                    path: target_directory.to_string(),
                    source: e,
                });
            }
            log::info!("Created directory: {}", target_directory);
        }

        log::info!("Branching Bazaar repository from '{}'", repo_url);
        match self.bzr.branch(repo_url, target) {
            Ok(()) => log::info!("Successfully branched Bazaar repository"),
            Err(BzrError::Branch(stderr)) => {
                log::error!("Error branching Bazaar repository: {}", stderr);
            }
            Err(e) => log::error!("Unexpected error branching Bazaar repository: {}", e),
        }

        Ok(())
    }

    fn icon(&self) -> String {
        metadata::load_icon(metadata::icon_override_path().as_deref())
    }

    fn connection_data(&self) -> ConnectionData {
        ConnectionData::bazaar()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::USERNAME;

    use std::path::PathBuf;

    #[cfg(unix)]
    fn stub_program(dir: &Path, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-bzr");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn source_with(params: SourceParams, program: &Path) -> BazaarSource {
        BazaarSource::new("bazaar", params)
            .with_bzr(BzrCli::with_program(program.to_str().unwrap()))
    }

    fn params_for(target: &Path) -> SourceParams {
        let mut params = SourceParams::new();
        params.set(REPO_URL, "bzr://example.com/trunk");
        params.set(TARGET_DIRECTORY, target.to_str().unwrap());
        params
    }

    #[test]
    fn fetch_fails_without_repo_url() {
        let mut params = SourceParams::new();
        params.set(TARGET_DIRECTORY, "/tmp/somewhere");

        let source = BazaarSource::new("bazaar", params);
        let err = source.fetch().unwrap_err();
        assert!(matches!(
            err,
            FetchError::MissingParam(ParamError::Missing(ref key)) if key == REPO_URL
        ));
    }

    #[test]
    fn fetch_fails_without_target_directory() {
        let mut params = SourceParams::new();
        params.set(REPO_URL, "bzr://example.com/trunk");

        let source = BazaarSource::new("bazaar", params);
        let err = source.fetch().unwrap_err();
        assert!(matches!(
            err,
            FetchError::MissingParam(ParamError::Missing(ref key)) if key == TARGET_DIRECTORY
        ));
    }

    #[cfg(unix)]
    #[test]
    fn fetch_creates_missing_target_directory_before_branching() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Failed to create temp directory");
        let target = temp_dir.path().join("nested").join("checkout");

        // The stub records whether the target existed when bzr ran.
        let program = stub_program(
            temp_dir.path(),
            "[ -d \"$3\" ] && touch \"$3/.dir-existed\"\nexit 0",
        );

        let source = source_with(params_for(&target), &program);
        source.fetch().expect("fetch should succeed");

        assert!(target.is_dir(), "target directory should have been created");
        assert!(
            target.join(".dir-existed").exists(),
            "directory must exist before bzr is invoked"
        );
    }

    #[cfg(unix)]
    #[test]
    fn fetch_leaves_existing_target_directory_alone() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Failed to create temp directory");
        let target = temp_dir.path().join("checkout");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), "existing content").unwrap();

        let program = stub_program(temp_dir.path(), "exit 0");
        let source = source_with(params_for(&target), &program);
        source.fetch().expect("fetch should succeed");

        let kept = std::fs::read_to_string(target.join("keep.txt")).unwrap();
        assert_eq!(kept, "existing content");
    }

    #[cfg(unix)]
    #[test]
    fn fetch_propagates_directory_creation_failure_and_skips_bzr() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Failed to create temp directory");

        // A regular file where a parent directory is needed makes
        // create_dir_all fail.
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let target = blocker.join("checkout");

        let marker = temp_dir.path().join("bzr-ran");
        let program = stub_program(
            temp_dir.path(),
            &format!("touch '{}'\nexit 0", marker.display()),
        );

        let source = source_with(params_for(&target), &program);
        let err = source.fetch().expect_err("directory creation must be fatal");

        assert!(matches!(err, FetchError::CreateDir { .. }));
        assert!(!marker.exists(), "bzr must not run after a fatal error");
    }

    #[cfg(unix)]
    #[test]
    fn fetch_swallows_branch_failure() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Failed to create temp directory");
        let target = temp_dir.path().join("checkout");

        let program = stub_program(
            temp_dir.path(),
            "echo 'bzr: ERROR: Connection refused' >&2\nexit 3",
        );

        let source = source_with(params_for(&target), &program);
        let result = source.fetch();
        assert!(
            result.is_ok(),
            "branch failure must not surface: {:?}",
            result.err()
        );
    }

    #[test]
    fn fetch_swallows_missing_executable() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Failed to create temp directory");
        let target = temp_dir.path().join("checkout");

        let source = BazaarSource::new("bazaar", params_for(&target))
            .with_bzr(BzrCli::with_program("/nonexistent/bzr"));
        let result = source.fetch();
        assert!(
            result.is_ok(),
            "spawn failure must not surface: {:?}",
            result.err()
        );
    }

    #[cfg(unix)]
    #[test]
    fn fetch_succeeds_on_zero_exit() {
        use tempfile::tempdir;

        let temp_dir = tempdir().expect("Failed to create temp directory");
        let target = temp_dir.path().join("checkout");

        let program = stub_program(temp_dir.path(), "exit 0");
        let source = source_with(params_for(&target), &program);
        assert!(source.fetch().is_ok());
    }

    #[test]
    fn connection_data_is_constant_regardless_of_params() {
        let empty = BazaarSource::new("bazaar", SourceParams::new());
        let mut params = SourceParams::new();
        params.set(USERNAME, "alice");
        params.set(REPO_URL, "bzr://example.com/trunk");
        let configured = BazaarSource::new("bazaar", params);

        assert_eq!(empty.connection_data(), configured.connection_data());
        assert_eq!(empty.connection_data(), ConnectionData::bazaar());
    }

    #[test]
    fn icon_is_nonempty_svg() {
        let source = BazaarSource::new("bazaar", SourceParams::new());
        let icon = source.icon();
        assert!(icon.trim_start().starts_with("<svg"));
    }

    #[test]
    fn builder_stores_host_bookkeeping() {
        let source = BazaarSource::new("bazaar", SourceParams::new())
            .with_session("session-42")
            .with_dependencies(vec!["upstream".to_string()])
            .with_subscribers(vec!["indexer".to_string()]);

        assert_eq!(source.name(), "bazaar");
        assert_eq!(source.session(), Some("session-42"));
        assert_eq!(source.dependencies(), ["upstream".to_string()]);
        assert_eq!(source.subscribers(), ["indexer".to_string()]);
    }
}
