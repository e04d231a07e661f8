//! Cascaded WMS/WMTS stores and their layers.

use crate::{endpoints, ClientError, GeoClient, Outcome};
use geobridge_model::{shapes, WmsLayer, WmsStore, WmtsLayer, WmtsStore};

impl GeoClient {
    pub fn get_wmsstore(
        &self,
        workspace: &str,
        name: &str,
    ) -> Result<Outcome<WmsStore>, ClientError> {
        let outcome = self.get_json(&endpoints::wmsstore(workspace, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => WmsStore::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON WMS store document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_wmsstore(&self, store: &WmsStore) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::wmsstore(&store.workspace, &store.name),
            &endpoints::wmsstores(&store.workspace),
            &store.put_payload(),
            &store.post_payload(),
        )
    }

    pub fn delete_wmsstore(
        &self,
        workspace: &str,
        name: &str,
        recurse: bool,
    ) -> Result<Outcome<()>, ClientError> {
        let recurse = if recurse { "true" } else { "false" };
        self.delete_resource(&endpoints::wmsstore(workspace, name), &[("recurse", recurse)])
    }

    pub fn get_wmslayer(
        &self,
        workspace: &str,
        store: &str,
        name: &str,
    ) -> Result<Outcome<WmsLayer>, ClientError> {
        let outcome = self.get_json(&endpoints::wmslayer(workspace, store, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => WmsLayer::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON WMS layer document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_wmslayer(&self, layer: &WmsLayer) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::wmslayer(&layer.workspace, &layer.store, &layer.name),
            &endpoints::wmslayers(&layer.workspace, &layer.store),
            &layer.put_payload(),
            &layer.post_payload(),
        )
    }

    pub fn delete_wmslayer(
        &self,
        workspace: &str,
        store: &str,
        name: &str,
    ) -> Result<Outcome<()>, ClientError> {
        self.delete_resource(&endpoints::wmslayer(workspace, store, name), &[])
    }

    pub fn list_wmslayers(&self, workspace: &str, store: &str) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::wmslayers(workspace, store))?;
        Ok(match outcome {
            Outcome::Success { body, .. } => body
                .as_json()
                .and_then(|doc| doc.get("wmsLayers"))
                .map(|col| shapes::named_members(Some(col), "wmsLayer"))
                .unwrap_or_default(),
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }

    pub fn get_wmtsstore(
        &self,
        workspace: &str,
        name: &str,
    ) -> Result<Outcome<WmtsStore>, ClientError> {
        let outcome = self.get_json(&endpoints::wmtsstore(workspace, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => WmtsStore::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON WMTS store document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_wmtsstore(&self, store: &WmtsStore) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::wmtsstore(&store.workspace, &store.name),
            &endpoints::wmtsstores(&store.workspace),
            &store.put_payload(),
            &store.post_payload(),
        )
    }

    pub fn delete_wmtsstore(
        &self,
        workspace: &str,
        name: &str,
        recurse: bool,
    ) -> Result<Outcome<()>, ClientError> {
        let recurse = if recurse { "true" } else { "false" };
        self.delete_resource(&endpoints::wmtsstore(workspace, name), &[("recurse", recurse)])
    }

    pub fn get_wmtslayer(
        &self,
        workspace: &str,
        store: &str,
        name: &str,
    ) -> Result<Outcome<WmtsLayer>, ClientError> {
        let outcome = self.get_json(&endpoints::wmtslayer(workspace, store, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => WmtsLayer::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON WMTS layer document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_wmtslayer(&self, layer: &WmtsLayer) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::wmtslayer(&layer.workspace, &layer.store, &layer.name),
            &endpoints::wmtslayers(&layer.workspace, &layer.store),
            &layer.put_payload(),
            &layer.post_payload(),
        )
    }

    pub fn delete_wmtslayer(
        &self,
        workspace: &str,
        store: &str,
        name: &str,
    ) -> Result<Outcome<()>, ClientError> {
        self.delete_resource(&endpoints::wmtslayer(workspace, store, name), &[])
    }

    pub fn list_wmtslayers(
        &self,
        workspace: &str,
        store: &str,
    ) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::wmtslayers(workspace, store))?;
        Ok(match outcome {
            Outcome::Success { body, .. } => body
                .as_json()
                .and_then(|doc| doc.get("wmtsLayers"))
                .map(|col| shapes::named_members(Some(col), "wmtsLayer"))
                .unwrap_or_default(),
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }
}
