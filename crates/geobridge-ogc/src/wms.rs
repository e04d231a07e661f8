//! WMS request marshaling: GetMap, GetFeatureInfo, GetLegendGraphic.

use crate::{xml::xml_to_value, OgcError};
use geobridge_client::{endpoints, GeoClient, Payload};

/// A raw OGC service response (image bytes, XML, JSON).
#[derive(Debug)]
pub struct OgcResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct GetMapRequest {
    pub layers: Vec<String>,
    pub bbox: (f64, f64, f64, f64),
    pub width: u32,
    pub height: u32,
    pub srs: String,
    pub format: String,
    pub styles: Vec<String>,
    pub transparent: bool,
    pub language: Option<String>,
}

impl GetMapRequest {
    pub fn new(layers: Vec<String>, bbox: (f64, f64, f64, f64), width: u32, height: u32) -> Self {
        Self {
            layers,
            bbox,
            width,
            height,
            srs: "EPSG:4326".to_owned(),
            format: "image/png".to_owned(),
            styles: Vec::new(),
            transparent: true,
            language: None,
        }
    }

    #[must_use]
    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = srs.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn bbox_param(&self) -> String {
        let (minx, miny, maxx, maxy) = self.bbox;
        format!("{minx},{miny},{maxx},{maxy}")
    }
}

/// Issue a GetMap. A 2xx answer that comes back as a service exception XML is
/// surfaced as [`OgcError::Service`] so callers never mistake it for pixels.
pub fn get_map(
    client: &GeoClient,
    workspace: &str,
    request: &GetMapRequest,
) -> Result<OgcResponse, OgcError> {
    let layers = request.layers.join(",");
    let styles = request.styles.join(",");
    let bbox = request.bbox_param();
    let width = request.width.to_string();
    let height = request.height.to_string();
    let transparent = request.transparent.to_string();
    let mut query: Vec<(&str, &str)> = vec![
        ("SERVICE", "WMS"),
        ("VERSION", "1.3.0"),
        ("REQUEST", "GetMap"),
        ("LAYERS", &layers),
        ("STYLES", &styles),
        ("CRS", &request.srs),
        ("BBOX", &bbox),
        ("WIDTH", &width),
        ("HEIGHT", &height),
        ("FORMAT", &request.format),
        ("TRANSPARENT", &transparent),
    ];
    if let Some(language) = &request.language {
        query.push(("ACCEPTLANGUAGES", language));
    }

    let resp = client.service_get(&endpoints::wms_service(workspace), &query)?;
    let content_type = resp.header("content-type").map(str::to_owned);
    vet_map_response(resp.status, content_type, resp.body)
}

fn vet_map_response(
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
) -> Result<OgcResponse, OgcError> {
    let is_exception = status >= 400
        || content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("xml") && !ct.contains("svg"));
    if is_exception {
        return Err(OgcError::Service {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(OgcResponse {
        status,
        content_type,
        body,
    })
}

#[derive(Debug, Clone)]
pub struct GetFeatureInfoRequest {
    pub map: GetMapRequest,
    /// Pixel column of the query point.
    pub i: u32,
    /// Pixel row of the query point.
    pub j: u32,
    pub info_format: String,
    pub feature_count: u32,
}

impl GetFeatureInfoRequest {
    pub fn new(map: GetMapRequest, i: u32, j: u32) -> Self {
        Self {
            map,
            i,
            j,
            info_format: "application/json".to_owned(),
            feature_count: 10,
        }
    }
}

/// Issue a GetFeatureInfo; JSON info formats decode to a value, anything else
/// (or a decode failure) comes back as raw text.
pub fn get_feature_info(
    client: &GeoClient,
    workspace: &str,
    request: &GetFeatureInfoRequest,
) -> Result<Payload, OgcError> {
    let layers = request.map.layers.join(",");
    let bbox = request.map.bbox_param();
    let width = request.map.width.to_string();
    let height = request.map.height.to_string();
    let i = request.i.to_string();
    let j = request.j.to_string();
    let feature_count = request.feature_count.to_string();
    let query: Vec<(&str, &str)> = vec![
        ("SERVICE", "WMS"),
        ("VERSION", "1.3.0"),
        ("REQUEST", "GetFeatureInfo"),
        ("LAYERS", &layers),
        ("QUERY_LAYERS", &layers),
        ("STYLES", ""),
        ("CRS", &request.map.srs),
        ("BBOX", &bbox),
        ("WIDTH", &width),
        ("HEIGHT", &height),
        ("I", &i),
        ("J", &j),
        ("INFO_FORMAT", &request.info_format),
        ("FEATURE_COUNT", &feature_count),
    ];

    let resp = client.service_get(&endpoints::wms_service(workspace), &query)?;
    if resp.status >= 400 {
        return Err(OgcError::Service {
            status: resp.status,
            body: resp.body_text(),
        });
    }
    Ok(Payload::from_bytes(&resp.body))
}

/// Fetch the legend image for a layer.
pub fn get_legend_graphic(
    client: &GeoClient,
    workspace: &str,
    layer: &str,
    format: &str,
    language: Option<&str>,
) -> Result<OgcResponse, OgcError> {
    let mut query: Vec<(&str, &str)> = vec![
        ("SERVICE", "WMS"),
        ("VERSION", "1.3.0"),
        ("REQUEST", "GetLegendGraphic"),
        ("LAYER", layer),
        ("FORMAT", format),
    ];
    if let Some(language) = language {
        query.push(("LANGUAGE", language));
    }
    let resp = client.service_get(&endpoints::wms_service(workspace), &query)?;
    let content_type = resp.header("content-type").map(str::to_owned);
    vet_map_response(resp.status, content_type, resp.body)
}

/// Parse a service exception body into a value for diagnostics.
pub fn parse_exception(body: &str) -> Result<serde_json::Value, OgcError> {
    xml_to_value(body)
}
