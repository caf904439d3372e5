//! Configuration parameters handed to a data source by the host config store.

use std::collections::BTreeMap;

use thiserror::Error;

/// Required parameter: location of the remote repository.
pub const REPO_URL: &str = "repo_url";
/// Required parameter: local directory the repository is fetched into.
pub const TARGET_DIRECTORY: &str = "target_directory";
/// Optional parameter: user name recorded by the host connection store.
pub const USERNAME: &str = "username";

/// Error type for parameter lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("missing required parameter '{0}'")]
    Missing(String),
}

/// String-to-string parameter mapping supplied by the host.
///
/// Values are not validated beyond presence: [`SourceParams::require`] fails
/// only when the key is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceParams(BTreeMap<String, String>);

impl SourceParams {
    /// Create an empty parameter mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up an optional parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a parameter the data source cannot run without.
    pub fn require(&self, key: &str) -> Result<&str, ParamError> {
        self.get(key).ok_or_else(|| ParamError::Missing(key.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SourceParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
