//! Plugin metadata exposed to the host: connection descriptor and icon.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Plugin icon, embedded at compile time. Used whenever no `icon.svg`
/// override is found next to the running executable.
pub const DEFAULT_ICON: &str = include_str!("../assets/icon.svg");

/// Connection descriptor the host uses to render configuration forms.
///
/// `fields` is ordered; hosts display the fields in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionData {
    pub connection_type: &'static str,
    pub fields: Vec<&'static str>,
}

impl ConnectionData {
    /// The Bazaar connection descriptor.
    pub fn bazaar() -> Self {
        Self {
            connection_type: "Bazaar",
            fields: vec!["username", "repo_url", "target_directory"],
        }
    }
}

/// Path probed for an icon override: `icon.svg` next to the running
/// executable. `None` when the executable location cannot be determined.
pub fn icon_override_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("icon.svg"))
}

/// Read icon markup from `path`, falling back to [`DEFAULT_ICON`] on any
/// read error. Never fails and never returns an empty string.
pub fn load_icon(path: Option<&Path>) -> String {
    match path {
        Some(p) => std::fs::read_to_string(p).unwrap_or_else(|_| DEFAULT_ICON.to_string()),
        None => DEFAULT_ICON.to_string(),
    }
}
