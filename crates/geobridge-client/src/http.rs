//! HTTP transport: four verbs, basic auth, fixed timeout, no retries.

use crate::{ClientError, InstanceConfig};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;
use std::io::Read;
use std::time::Duration;

/// A response whose status has already been vetted against the verb's
/// expected set: 2xx plus 404 for GET/DELETE and 409 for POST.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    headers: Vec<(String, String)>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub(crate) struct Transport {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl Transport {
    pub fn new(config: &InstanceConfig) -> Self {
        let mut builder = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            // Statuses are data here; expected-set checks happen per verb.
            .http_status_as_error(false);
        if !config.verify_tls {
            builder = builder.tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            );
        }
        let agent = ureq::Agent::new_with_config(builder.build());
        let credentials = BASE64.encode(format!("{}:{}", config.user, config.password));
        Self {
            agent,
            base_url: config.url.clone(),
            authorization: format!("Basic {credentials}"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<HttpResponse, ClientError> {
        let url = self.url(path);
        let resp = self
            .agent
            .get(&url)
            .query_pairs(query.iter().copied())
            .header("Authorization", &self.authorization)
            .call()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        self.vet("GET", &url, resp, &[404])
    }

    pub fn post_json(&self, path: &str, body: &Value) -> Result<HttpResponse, ClientError> {
        self.post_raw(path, "application/json", body.to_string().as_bytes())
    }

    pub fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<HttpResponse, ClientError> {
        let url = self.url(path);
        let resp = self
            .agent
            .post(&url)
            .header("Authorization", &self.authorization)
            .header("Content-Type", content_type)
            .send(data)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        self.vet("POST", &url, resp, &[409])
    }

    pub fn put_json(&self, path: &str, body: &Value) -> Result<HttpResponse, ClientError> {
        self.put_raw(path, "application/json", body.to_string().as_bytes())
    }

    pub fn put_raw(
        &self,
        path: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<HttpResponse, ClientError> {
        let url = self.url(path);
        let resp = self
            .agent
            .put(&url)
            .header("Authorization", &self.authorization)
            .header("Content-Type", content_type)
            .send(data)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        // PUT has no expected negative: the caller probed first.
        self.vet("PUT", &url, resp, &[])
    }

    /// GET whose status comes back as data, for OGC service endpoints where
    /// the caller interprets exceptions itself.
    pub fn get_any(&self, path: &str, query: &[(&str, &str)]) -> Result<HttpResponse, ClientError> {
        let url = self.url(path);
        let resp = self
            .agent
            .get(&url)
            .query_pairs(query.iter().copied())
            .header("Authorization", &self.authorization)
            .call()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        self.read("GET", &url, resp)
    }

    /// POST whose status comes back as data (WFS transactions).
    pub fn post_any(
        &self,
        path: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<HttpResponse, ClientError> {
        let url = self.url(path);
        let resp = self
            .agent
            .post(&url)
            .header("Authorization", &self.authorization)
            .header("Content-Type", content_type)
            .send(data)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        self.read("POST", &url, resp)
    }

    pub fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<HttpResponse, ClientError> {
        let url = self.url(path);
        let resp = self
            .agent
            .delete(&url)
            .query_pairs(query.iter().copied())
            .header("Authorization", &self.authorization)
            .call()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        self.vet("DELETE", &url, resp, &[404])
    }

    /// Log the exchange and drain the body.
    fn read(
        &self,
        method: &str,
        url: &str,
        resp: ureq::http::Response<ureq::Body>,
    ) -> Result<HttpResponse, ClientError> {
        let status = resp.status().as_u16();
        tracing::debug!("{method} {status} {url}");

        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_lowercase(), v.to_owned()))
            })
            .collect();
        let mut body = Vec::new();
        resp.into_body()
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }

    /// Reject statuses outside 2xx + `expected`.
    fn vet(
        &self,
        method: &str,
        url: &str,
        resp: ureq::http::Response<ureq::Body>,
        expected: &[u16],
    ) -> Result<HttpResponse, ClientError> {
        let resp = self.read(method, url, resp)?;
        if (200..300).contains(&resp.status) || expected.contains(&resp.status) {
            Ok(resp)
        } else {
            Err(ClientError::Http {
                status: resp.status,
                url: url.to_owned(),
                body: resp.body_text(),
            })
        }
    }
}
