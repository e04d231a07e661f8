//! Feature types, coverages and their publishing records.

use crate::{endpoints, ClientError, GeoClient, Outcome};
use geobridge_model::{shapes, Coverage, FeatureType, Layer};

impl GeoClient {
    pub fn get_featuretype(
        &self,
        workspace: &str,
        datastore: &str,
        name: &str,
    ) -> Result<Outcome<FeatureType>, ClientError> {
        let outcome = self.get_json(&endpoints::featuretype(workspace, datastore, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => FeatureType::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON feature type document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_featuretype(&self, featuretype: &FeatureType) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::featuretype(
                &featuretype.workspace,
                &featuretype.store,
                &featuretype.name,
            ),
            &endpoints::featuretypes(&featuretype.workspace, &featuretype.store),
            &featuretype.put_payload(),
            &featuretype.post_payload(),
        )
    }

    pub fn delete_featuretype(
        &self,
        workspace: &str,
        datastore: &str,
        name: &str,
        recurse: bool,
    ) -> Result<Outcome<()>, ClientError> {
        let recurse = if recurse { "true" } else { "false" };
        self.delete_resource(
            &endpoints::featuretype(workspace, datastore, name),
            &[("recurse", recurse)],
        )
    }

    pub fn list_featuretypes(
        &self,
        workspace: &str,
        datastore: &str,
    ) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::featuretypes(workspace, datastore))?;
        Ok(match outcome {
            Outcome::Success { body, .. } => body
                .as_json()
                .and_then(|doc| doc.get("featureTypes"))
                .map(|col| shapes::named_members(Some(col), "featureType"))
                .unwrap_or_default(),
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }

    pub fn get_coverage(
        &self,
        workspace: &str,
        coveragestore: &str,
        name: &str,
    ) -> Result<Outcome<Coverage>, ClientError> {
        let outcome = self.get_json(&endpoints::coverage(workspace, coveragestore, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => Coverage::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON coverage document for '{workspace}:{name}'"
            ))),
        })
    }

    pub fn create_coverage(&self, coverage: &Coverage) -> Result<Outcome<()>, ClientError> {
        self.create_or_update(
            &endpoints::coverage(&coverage.workspace, &coverage.store, &coverage.name),
            &endpoints::coverages(&coverage.workspace, &coverage.store),
            &coverage.put_payload(),
            &coverage.post_payload(),
        )
    }

    pub fn delete_coverage(
        &self,
        workspace: &str,
        coveragestore: &str,
        name: &str,
    ) -> Result<Outcome<()>, ClientError> {
        self.delete_resource(&endpoints::coverage(workspace, coveragestore, name), &[])
    }

    /// Names of the coverages published from one store. The server answers
    /// with `{"coverages": {"coverage": [...]}}` here but `{"list":
    /// {"string": [...]}}` when `list=all` is used; both shapes are accepted.
    pub fn list_coverages(
        &self,
        workspace: &str,
        coveragestore: &str,
    ) -> Result<Vec<String>, ClientError> {
        let outcome = self.get_json(&endpoints::coverages(workspace, coveragestore))?;
        Ok(match outcome {
            Outcome::Success { body, .. } => {
                let Some(doc) = body.as_json() else {
                    return Ok(Vec::new());
                };
                if let Some(col) = doc.get("coverages") {
                    shapes::named_members(Some(col), "coverage")
                } else {
                    shapes::string_list(doc.get("list"), "string")
                }
            }
            Outcome::NotFound | Outcome::Conflict => Vec::new(),
        })
    }

    pub fn get_layer(&self, workspace: &str, name: &str) -> Result<Outcome<Layer>, ClientError> {
        let outcome = self.get_json(&endpoints::layer(workspace, name))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => Layer::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON layer document for '{workspace}:{name}'"
            ))),
        })
    }

    /// Layers exist implicitly once their resource is published; updates
    /// (default style, flags) go through PUT only.
    pub fn update_layer(&self, workspace: &str, layer: &Layer) -> Result<Outcome<()>, ClientError> {
        self.put_resource(&endpoints::layer(workspace, &layer.name), &layer.put_payload())
    }

    pub fn delete_layer(&self, workspace: &str, name: &str) -> Result<Outcome<()>, ClientError> {
        self.delete_resource(&endpoints::layer(workspace, name), &[])
    }
}
