//! WMS capability-document introspection under language negotiation.

use crate::{xml::xml_to_value, OgcError};
use geobridge_client::{endpoints, GeoClient};
use geobridge_model::shapes::one_or_many;
use serde_json::Value;

/// Marker the server emits in place of a title when neither the requested
/// language nor a fallback has content for the element.
pub const I18N_CONTENT_MISSING: &str = "DID NOT FIND i18n CONTENT FOR THIS ELEMENT";

/// A layer entry extracted from the capability document.
#[derive(Debug, Clone, PartialEq)]
pub struct WmsLayerSummary {
    pub name: String,
    pub title: Option<String>,
    /// West/south/east/north geographic bounds, when advertised.
    pub bbox: Option<(f64, f64, f64, f64)>,
}

impl WmsLayerSummary {
    /// Whether the advertised title is the server's missing-content marker.
    pub fn title_is_missing_marker(&self) -> bool {
        self.title.as_deref() == Some(I18N_CONTENT_MISSING)
    }
}

/// Fetch the workspace's WMS 1.3.0 capability document, optionally asking for
/// a specific language, and convert it to a JSON-shaped value.
pub fn get_capabilities(
    client: &GeoClient,
    workspace: &str,
    language: Option<&str>,
) -> Result<Value, OgcError> {
    let mut query: Vec<(&str, &str)> = vec![
        ("SERVICE", "WMS"),
        ("VERSION", "1.3.0"),
        ("REQUEST", "GetCapabilities"),
    ];
    if let Some(language) = language {
        query.push(("ACCEPTLANGUAGES", language));
    }
    let resp = client.service_get(&endpoints::wms_service(workspace), &query)?;
    if resp.status >= 400 {
        return Err(OgcError::Service {
            status: resp.status,
            body: resp.body_text(),
        });
    }
    xml_to_value(&resp.body_text())
}

/// List the workspace's WMS layers with the titles the server advertises for
/// `language`. Title fallback (requested language → default → server priority
/// order → missing-content marker) happens server-side; this only reads the
/// result.
pub fn wms_layers(
    client: &GeoClient,
    workspace: &str,
    language: Option<&str>,
) -> Result<Vec<WmsLayerSummary>, OgcError> {
    let doc = get_capabilities(client, workspace, language)?;
    let root = doc
        .get("WMS_Capabilities")
        .ok_or_else(|| OgcError::Capabilities("no WMS_Capabilities root".to_owned()))?;
    let top_layer = root
        .get("Capability")
        .and_then(|c| c.get("Layer"))
        .ok_or_else(|| OgcError::Capabilities("no Capability/Layer element".to_owned()))?;

    let mut layers = Vec::new();
    for layer in one_or_many(top_layer.get("Layer")) {
        let Some(name) = layer.get("Name").and_then(Value::as_str) else {
            continue;
        };
        layers.push(WmsLayerSummary {
            name: name.to_owned(),
            title: title_text(&layer),
            bbox: geographic_bbox(&layer),
        });
    }
    Ok(layers)
}

fn title_text(layer: &Value) -> Option<String> {
    match layer.get("Title")? {
        Value::String(text) => Some(text.clone()),
        // Title with attributes keeps the `$` key.
        Value::Object(obj) => obj.get("$").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}

fn geographic_bbox(layer: &Value) -> Option<(f64, f64, f64, f64)> {
    let bbox = layer.get("EX_GeographicBoundingBox")?;
    let bound = |field: &str| {
        bbox.get(field)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<f64>().ok())
    };
    Some((
        bound("westBoundLongitude")?,
        bound("southBoundLatitude")?,
        bound("eastBoundLongitude")?,
        bound("northBoundLatitude")?,
    ))
}
