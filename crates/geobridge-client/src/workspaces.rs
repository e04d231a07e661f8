//! Workspace operations.

use crate::{endpoints, ClientError, GeoClient, Outcome};
use geobridge_model::{shapes, Workspace};

impl GeoClient {
    pub fn get_workspace(&self, name: &str) -> Result<Outcome<Workspace>, ClientError> {
        let outcome = self.get_json(&endpoints::workspace(name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => Workspace::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON workspace document for '{name}'"
            ))),
        })
    }

    /// Create the workspace, or update it in place if the name is taken.
    pub fn create_workspace(&self, workspace: &Workspace) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::workspace(&workspace.name),
            &endpoints::workspaces(),
            &workspace.put_payload(),
            &workspace.post_payload(),
        )
    }

    /// Delete the workspace; `recurse` cascades to contained stores, feature
    /// types and layers.
    pub fn delete_workspace(&self, name: &str, recurse: bool) -> Result<Outcome<()>, ClientError> {
        let recurse = if recurse { "true" } else { "false" };
        self.delete_resource(&endpoints::workspace(name), &[("recurse", recurse)])
    }

    pub fn list_workspaces(&self) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::workspaces())?;
        Ok(match outcome {
            Outcome::Success { body, .. } => body
                .as_json()
                .and_then(|doc| doc.get("workspaces"))
                .map(|col| shapes::named_members(Some(col), "workspace"))
                .unwrap_or_default(),
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }
}
