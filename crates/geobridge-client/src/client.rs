//! The client handle and the generic catalog access patterns.

use crate::http::{HttpResponse, Transport};
use crate::{ClientError, InstanceConfig, Outcome, Payload};
use serde_json::Value;

/// A handle on one server instance. Cheap to construct; holds no catalog
/// state, so every operation re-probes the remote.
pub struct GeoClient {
    transport: Transport,
}

impl GeoClient {
    pub fn new(config: &InstanceConfig) -> Self {
        Self {
            transport: Transport::new(config),
        }
    }

    /// The instance base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// GET a JSON document; 404 is an ordinary [`Outcome::NotFound`].
    pub fn get_json(&self, path: &str) -> Result<Outcome<Payload>, ClientError> {
        let resp = self.transport.get(path, &[])?;
        if resp.status == 404 {
            return Ok(Outcome::NotFound);
        }
        Ok(Outcome::Success {
            status: resp.status,
            body: Payload::from_bytes(&resp.body),
        })
    }

    /// Create-or-update for a named resource.
    ///
    /// Probes the item path first: a 200 means the name is taken and the
    /// write becomes a PUT; otherwise the create payload is POSTed to the
    /// collection. Several resource kinds answer a duplicate POST with a 500
    /// instead of a clean 409, which is why the probe exists at all. The
    /// probe-then-write pair is not atomic; concurrent creators can race.
    pub(crate) fn create_or_update(
        &self,
        item_path: &str,
        collection_path: &str,
        put_payload: &Value,
        post_payload: &Value,
    ) -> Result<Outcome<()>, ClientError> {
        let probe = self.transport.get(item_path, &[])?;
        if probe.status == 200 {
            let resp = self.transport.put_json(item_path, put_payload)?;
            return Ok(Outcome::Success {
                status: resp.status,
                body: (),
            });
        }
        let resp = self.transport.post_json(collection_path, post_payload)?;
        if resp.status == 409 {
            return Ok(Outcome::Conflict);
        }
        Ok(Outcome::Success {
            status: resp.status,
            body: (),
        })
    }

    /// PUT an update without probing (for resources that only accept PUT,
    /// like layer publishing records and service settings).
    pub(crate) fn put_resource(
        &self,
        path: &str,
        payload: &Value,
    ) -> Result<Outcome<()>, ClientError> {
        let resp = self.transport.put_json(path, payload)?;
        Ok(Outcome::Success {
            status: resp.status,
            body: (),
        })
    }

    /// DELETE a resource; 404 is an ordinary [`Outcome::NotFound`].
    pub(crate) fn delete_resource(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Outcome<()>, ClientError> {
        let resp = self.transport.delete(path, query)?;
        if resp.status == 404 {
            return Ok(Outcome::NotFound);
        }
        Ok(Outcome::Success {
            status: resp.status,
            body: (),
        })
    }

    pub(crate) fn get_raw(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, ClientError> {
        self.transport.get(path, query)
    }

    pub(crate) fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<HttpResponse, ClientError> {
        self.transport.post_raw(path, content_type, data)
    }

    pub(crate) fn put_raw(
        &self,
        path: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<HttpResponse, ClientError> {
        self.transport.put_raw(path, content_type, data)
    }

    /// GET against an OGC service endpoint (WMS/WFS/WMTS); the caller owns
    /// status interpretation.
    pub fn service_get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, ClientError> {
        self.transport.get_any(path, query)
    }

    /// POST an OGC request body (WFS transactions).
    pub fn service_post(
        &self,
        path: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<HttpResponse, ClientError> {
        self.transport.post_any(path, content_type, body)
    }
}
