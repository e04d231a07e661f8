//! Per-workspace service settings operations.

use crate::{endpoints, ClientError, GeoClient, Outcome};
use geobridge_model::{WfsSettings, WmsSettings};

impl GeoClient {
    pub fn get_wms_settings(&self, workspace: &str) -> Result<Outcome<WmsSettings>, ClientError> {
        let outcome = self.get_json(&endpoints::wms_settings(workspace))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => WmsSettings::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON WMS settings document for '{workspace}'"
            ))),
        })
    }

    /// Settings documents only accept PUT; the server creates the workspace
    /// override on first write.
    pub fn put_wms_settings(&self, settings: &WmsSettings) -> Result<Outcome<()>, ClientError> {
        self.put_resource(
            &endpoints::wms_settings(&settings.workspace),
            &settings.put_payload(),
        )
    }

    pub fn delete_wms_settings(&self, workspace: &str) -> Result<Outcome<()>, ClientError> {
        self.delete_resource(&endpoints::wms_settings(workspace), &[])
    }

    pub fn get_wfs_settings(&self, workspace: &str) -> Result<Outcome<WfsSettings>, ClientError> {
        let outcome = self.get_json(&endpoints::wfs_settings(workspace))?;
        outcome.try_map(|payload| match payload.as_json() {
            Some(doc) => WfsSettings::from_get_response(doc).map_err(ClientError::from),
            None => Err(ClientError::Transport(format!(
                "non-JSON WFS settings document for '{workspace}'"
            ))),
        })
    }

    pub fn put_wfs_settings(&self, settings: &WfsSettings) -> Result<Outcome<()>, ClientError> {
        self.put_resource(
            &endpoints::wfs_settings(&settings.workspace),
            &settings.put_payload(),
        )
    }

    pub fn delete_wfs_settings(&self, workspace: &str) -> Result<Outcome<()>, ClientError> {
        self.delete_resource(&endpoints::wfs_settings(workspace), &[])
    }
}
