//! Wire-format resource models for a geospatial map server's admin REST API.
//!
//! Each model builds the JSON document the server expects on create/update
//! (`post_payload`/`put_payload`, optional fields omitted when unset) and
//! parses the server's GET response back into typed fields
//! (`from_get_response`). The server's JSON is inconsistent across resource
//! kinds — single-element lists collapse to bare objects, key/value maps are
//! encoded as entry arrays, titles come as plain strings or locale maps — so
//! all of that variance is normalized by the helpers in [`shapes`], [`entries`]
//! and [`i18n`] before any field is read.

pub mod bbox;
pub mod coverage;
pub mod datastore;
pub mod entries;
pub mod featuretype;
pub mod i18n;
pub mod layer;
pub mod layergroup;
pub mod settings;
pub mod shapes;
pub mod style;
pub mod workspace;

pub use bbox::{BoundingBox, CrsRef};
pub use coverage::{Coverage, CoverageStore};
pub use datastore::DataStore;
pub use entries::EntryList;
pub use featuretype::{Attribute, FeatureType, MetadataLink};
pub use i18n::I18nText;
pub use layer::{Layer, WmsLayer, WmsStore, WmtsLayer, WmtsStore};
pub use layergroup::LayerGroup;
pub use settings::{WfsSettings, WmsSettings};
pub use style::{Legend, Style, StyleFormat};
pub use workspace::Workspace;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing field '{field}' in {document} document")]
    MissingField {
        document: &'static str,
        field: &'static str,
    },
    #[error("unexpected shape for '{field}' in {document} document")]
    UnexpectedShape {
        document: &'static str,
        field: &'static str,
    },
    #[error("expected a top-level '{0}' object")]
    MissingRoot(&'static str),
}

/// Unwrap the single root object the server wraps every resource document in,
/// e.g. `{"workspace": {...}}` → the inner object.
pub(crate) fn unwrap_root<'a>(
    doc: &'a serde_json::Value,
    root: &'static str,
) -> Result<&'a serde_json::Value, ModelError> {
    doc.get(root).ok_or(ModelError::MissingRoot(root))
}

pub(crate) fn require_str(
    obj: &serde_json::Value,
    document: &'static str,
    field: &'static str,
) -> Result<String, ModelError> {
    obj.get(field)
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or(ModelError::MissingField { document, field })
}

/// Read `{"name": "..."}` reference objects (`workspace`, `store`, ...),
/// tolerating a bare string in their place.
pub(crate) fn name_ref(obj: &serde_json::Value, field: &str) -> Option<String> {
    match obj.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(o) => o
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        _ => None,
    }
}
