//! Layer group operations.

use crate::{endpoints, ClientError, GeoClient, Outcome};
use geobridge_model::{shapes, LayerGroup};

impl GeoClient {
    pub fn get_layergroup(
        &self,
        workspace: &str,
        name: &str,
    ) -> Result<Outcome<LayerGroup>, ClientError> {
        let outcome = self.get_json(&endpoints::layergroup(workspace, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => LayerGroup::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON layer group document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_layergroup(&self, group: &LayerGroup) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::layergroup(&group.workspace, &group.name),
            &endpoints::layergroups(&group.workspace),
            &group.put_payload(),
            &group.post_payload(),
        )
    }

    pub fn delete_layergroup(
        &self,
        workspace: &str,
        name: &str,
    ) -> Result<Outcome<()>, ClientError> {
        self.delete_resource(&endpoints::layergroup(workspace, name), &[])
    }

    pub fn list_layergroups(&self, workspace: &str) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::layergroups(workspace))?;
        Ok(match outcome {
            Outcome::Success { body, .. } => body
                .as_json()
                .and_then(|doc| doc.get("layerGroups"))
                .map(|col| shapes::named_members(Some(col), "layerGroup"))
                .unwrap_or_default(),
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }
}
