//! OGC operations facade: WMS, WFS and WMTS requests against one server
//! instance, plus capability-document introspection.
//!
//! No protocol logic lives here beyond parameter marshaling and response
//! normalization — the wire formats are fixed external contracts. XML bodies
//! are converted to JSON-shaped values by [`xml::xml_to_value`]; JSON bodies
//! pass through with a raw-text fallback when decoding fails.

pub mod capabilities;
pub mod wfs;
pub mod wms;
pub mod wmts;
pub mod xml;

pub use capabilities::{wms_layers, WmsLayerSummary, I18N_CONTENT_MISSING};
pub use wfs::{delete_transaction, insert_transaction, FeatureAttribute};
pub use wms::{GetFeatureInfoRequest, GetMapRequest, OgcResponse};
pub use wmts::{GetTileRequest, TileResponse};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OgcError {
    #[error(transparent)]
    Client(#[from] geobridge_client::ClientError),
    #[error("service exception ({status}): {body}")]
    Service { status: u16, body: String },
    #[error("malformed capabilities document: {0}")]
    Capabilities(String),
    #[error("XML error: {0}")]
    Xml(String),
}
