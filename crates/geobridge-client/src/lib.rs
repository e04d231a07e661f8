//! Blocking REST client for a geospatial map server's admin API.
//!
//! The transport issues authenticated HTTP against one server instance with a
//! fixed timeout and TLS policy. "Not found" on GET/DELETE and "conflict" on
//! POST are ordinary outcomes of probing a remote catalog, so they are carried
//! as values in [`Outcome`] rather than raised; every other non-2xx status is
//! a [`ClientError::Http`]. Create operations probe the item path first and
//! switch to PUT when the resource already exists, which makes them
//! idempotent at the cost of one extra round-trip (and racy when two clients
//! create the same name concurrently — no locking is provided).

pub mod config;
pub mod endpoints;
mod http;

mod cascaded;
mod client;
mod groups;
mod published;
mod settings;
mod stores;
mod styles;
mod tiles;
mod workspaces;

pub use client::GeoClient;
pub use config::{InstanceConfig, Instances};
pub use http::HttpResponse;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP {status} for {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid resource document: {0}")]
    Model(#[from] geobridge_model::ModelError),
    #[error("config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Value-level HTTP semantics for catalog operations.
///
/// `NotFound` is the normal answer to an existence probe and `Conflict` the
/// normal answer to re-creating something that exists; callers pattern-match
/// instead of catching errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success { status: u16, body: T },
    NotFound,
    Conflict,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The success body, discarding the status.
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success { body, .. } => Some(body),
            Self::NotFound | Self::Conflict => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success { status, body } => Outcome::Success {
                status,
                body: f(body),
            },
            Self::NotFound => Outcome::NotFound,
            Self::Conflict => Outcome::Conflict,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Outcome<U>, E> {
        Ok(match self {
            Self::Success { status, body } => Outcome::Success {
                status,
                body: f(body)?,
            },
            Self::NotFound => Outcome::NotFound,
            Self::Conflict => Outcome::Conflict,
        })
    }
}

/// A response body that was expected to be JSON. Decode failures fall back to
/// the raw text instead of erroring, since the server answers some error
/// branches with HTML or plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

impl Payload {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_map_keeps_variant() {
        let success = Outcome::Success {
            status: 200,
            body: 2,
        };
        assert_eq!(
            success.map(|n| n * 2),
            Outcome::Success {
                status: 200,
                body: 4
            }
        );
        assert_eq!(Outcome::<i32>::NotFound.map(|n| n * 2), Outcome::NotFound);
        assert_eq!(Outcome::<i32>::Conflict.map(|n| n * 2), Outcome::Conflict);
    }

    #[test]
    fn payload_falls_back_to_text() {
        assert_eq!(
            Payload::from_bytes(b"{\"a\": 1}"),
            Payload::Json(serde_json::json!({"a": 1}))
        );
        assert_eq!(
            Payload::from_bytes(b"<html>error</html>"),
            Payload::Text("<html>error</html>".to_owned())
        );
    }
}
