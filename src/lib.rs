//! Bazaar data source plugin.
//!
//! Fetches a remote Bazaar repository into a local directory by shelling out
//! to the `bzr` CLI and exposes plugin metadata (icon, connection fields) to
//! a host ingestion pipeline. There is no wire-protocol implementation here;
//! `bzr branch` does the work and this crate wraps it with directory setup,
//! logging, and the metadata contract hosts expect from a data source.

pub mod bzr;
pub mod metadata;
pub mod params;
pub mod source;

pub use bzr::{BzrCli, BzrError};
pub use metadata::{ConnectionData, DEFAULT_ICON};
pub use params::{ParamError, SourceParams};
pub use source::{BazaarSource, DataSource, FetchError};
