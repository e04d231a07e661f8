//! Tile-cache (GWC) REST operations.

use crate::{endpoints, ClientError, GeoClient, Outcome, Payload};
use serde_json::json;

impl GeoClient {
    /// The tile cache's record for a published layer.
    pub fn get_cached_layer(
        &self,
        workspace: &str,
        layer: &str,
    ) -> Result<Outcome<Payload>, ClientError> {
        self.get_json(&endpoints::gwc_layer(workspace, layer))
    }

    /// Ask the cache to seed tiles for a layer over a zoom range.
    pub fn seed_layer(
        &self,
        workspace: &str,
        layer: &str,
        gridset: &str,
        format: &str,
        zoom_start: u32,
        zoom_stop: u32,
    ) -> Result<Outcome<()>, ClientError> {
        let body = json!({
            "seedRequest": {
                "name": format!("{workspace}:{layer}"),
                "gridSetId": gridset,
                "format": format,
                "zoomStart": zoom_start,
                "zoomStop": zoom_stop,
                "type": "seed",
                "threadCount": 1,
            }
        });
        let resp = self.post_raw(
            &endpoints::gwc_seed(workspace, layer),
            "application/json",
            body.to_string().as_bytes(),
        )?;
        if resp.status == 409 {
            return Ok(Outcome::Conflict);
        }
        Ok(Outcome::Success {
            status: resp.status,
            body: (),
        })
    }

    /// Drop all cached tiles for a layer.
    pub fn truncate_layer(
        &self,
        workspace: &str,
        layer: &str,
        gridset: &str,
        format: &str,
    ) -> Result<Outcome<()>, ClientError> {
        let body = json!({
            "seedRequest": {
                "name": format!("{workspace}:{layer}"),
                "gridSetId": gridset,
                "format": format,
                "type": "truncate",
            }
        });
        let resp = self.post_raw(
            &endpoints::gwc_seed(workspace, layer),
            "application/json",
            body.to_string().as_bytes(),
        )?;
        if resp.status == 409 {
            return Ok(Outcome::Conflict);
        }
        Ok(Outcome::Success {
            status: resp.status,
            body: (),
        })
    }
}
