//! Workspace replication between two server instances.
//!
//! A [`SyncJob`] holds a client for the source and one for the destination
//! and copies a workspace's styles, PostGIS datastores (with their feature
//! types and layer publishing records) and layer groups across, sequentially.
//! Cross-instance references are never transferred verbatim: every document
//! is parsed into its typed model and re-rendered, so store, namespace and
//! href references are regenerated from the destination's own fields.

mod job;

pub use job::{SyncJob, SyncOptions, SyncReport};

use geobridge_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Workspace absent where the plan requires it to exist.
    #[error("workspace '{workspace}' not found on {side}")]
    WorkspaceMissing { side: &'static str, workspace: String },

    /// Destination datastore absent when copying its dependent resources.
    #[error("datastore '{workspace}:{datastore}' not found on destination")]
    DatastoreMissing {
        workspace: String,
        datastore: String,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl SyncError {
    /// True when the failure is a missing dependency rather than a transport
    /// or server fault (drives the CLI's exit code).
    pub fn is_dependency_missing(&self) -> bool {
        matches!(
            self,
            Self::WorkspaceMissing { .. } | Self::DatastoreMissing { .. }
        )
    }
}
