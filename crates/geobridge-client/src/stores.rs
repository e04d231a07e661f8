//! Vector and raster store operations.

use crate::{endpoints, ClientError, GeoClient, Outcome};
use geobridge_model::{shapes, CoverageStore, DataStore};

impl GeoClient {
    pub fn get_datastore(
        &self,
        workspace: &str,
        name: &str,
    ) -> Result<Outcome<DataStore>, ClientError> {
        let outcome = self.get_json(&endpoints::datastore(workspace, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => DataStore::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON datastore document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_datastore(&self, store: &DataStore) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::datastore(&store.workspace, &store.name),
            &endpoints::datastores(&store.workspace),
            &store.put_payload(),
            &store.post_payload(),
        )
    }

    /// Delete the store; `recurse` cascades to its feature types and layers.
    pub fn delete_datastore(
        &self,
        workspace: &str,
        name: &str,
        recurse: bool,
    ) -> Result<Outcome<()>, ClientError> {
        let recurse = if recurse { "true" } else { "false" };
        self.delete_resource(
            &endpoints::datastore(workspace, name),
            &[("recurse", recurse)],
        )
    }

    pub fn list_datastores(&self, workspace: &str) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::datastores(workspace))?;
        Ok(match outcome {
            Outcome::Success { body, .. } => body
                .as_json()
                .and_then(|doc| doc.get("dataStores"))
                .map(|col| shapes::named_members(Some(col), "dataStore"))
                .unwrap_or_default(),
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }

    pub fn get_coveragestore(
        &self,
        workspace: &str,
        name: &str,
    ) -> Result<Outcome<CoverageStore>, ClientError> {
        let outcome = self.get_json(&endpoints::coveragestore(workspace, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => CoverageStore::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON coverage store document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_coveragestore(&self, store: &CoverageStore) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::coveragestore(&store.workspace, &store.name),
            &endpoints::coveragestores(&store.workspace),
            &store.put_payload(),
            &store.post_payload(),
        )
    }

    pub fn delete_coveragestore(
        &self,
        workspace: &str,
        name: &str,
        recurse: bool,
    ) -> Result<Outcome<()>, ClientError> {
        let recurse = if recurse { "true" } else { "false" };
        self.delete_resource(
            &endpoints::coveragestore(workspace, name),
            &[("recurse", recurse)],
        )
    }

    pub fn list_coveragestores(&self, workspace: &str) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::coveragestores(workspace))?;
        Ok(match outcome {
            Outcome::Success { body, .. } => body
                .as_json()
                .and_then(|doc| doc.get("coverageStores"))
                .map(|col| shapes::named_members(Some(col), "coverageStore"))
                .unwrap_or_default(),
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }
}
