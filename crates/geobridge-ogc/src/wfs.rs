//! WFS request marshaling: GetFeature, DescribeFeatureType, GetPropertyValue
//! and transactions.

use crate::{xml::xml_to_value, OgcError};
use geobridge_client::{endpoints, GeoClient, Payload};
use serde_json::Value;

/// Fetch features as GeoJSON. Returns the decoded FeatureCollection value.
pub fn get_feature(
    client: &GeoClient,
    workspace: &str,
    type_name: &str,
    count: Option<u32>,
) -> Result<Value, OgcError> {
    let count_param = count.map(|c| c.to_string());
    let mut query: Vec<(&str, &str)> = vec![
        ("SERVICE", "WFS"),
        ("VERSION", "2.0.0"),
        ("REQUEST", "GetFeature"),
        ("TYPENAMES", type_name),
        ("OUTPUTFORMAT", "application/json"),
    ];
    if let Some(count_param) = &count_param {
        query.push(("COUNT", count_param));
    }
    let resp = client.service_get(&endpoints::ows_service(workspace), &query)?;
    if resp.status >= 400 {
        return Err(OgcError::Service {
            status: resp.status,
            body: resp.body_text(),
        });
    }
    match Payload::from_bytes(&resp.body) {
        Payload::Json(value) => Ok(value),
        Payload::Text(text) => Err(OgcError::Service {
            status: resp.status,
            body: text,
        }),
    }
}

/// Fetch the schema of one feature type (or the whole workspace when `None`).
/// XML schemas are converted to a JSON-shaped value; JSON passes through.
pub fn describe_feature_type(
    client: &GeoClient,
    workspace: &str,
    type_name: Option<&str>,
) -> Result<Value, OgcError> {
    let mut query: Vec<(&str, &str)> = vec![
        ("SERVICE", "WFS"),
        ("VERSION", "2.0.0"),
        ("REQUEST", "DescribeFeatureType"),
    ];
    if let Some(type_name) = type_name {
        query.push(("TYPENAMES", type_name));
    }
    let resp = client.service_get(&endpoints::ows_service(workspace), &query)?;
    if resp.status >= 400 {
        return Err(OgcError::Service {
            status: resp.status,
            body: resp.body_text(),
        });
    }
    match Payload::from_bytes(&resp.body) {
        Payload::Json(value) => Ok(value),
        Payload::Text(text) => xml_to_value(&text),
    }
}

/// Fetch one property across all features of a type (WFS 2.0).
pub fn get_property_value(
    client: &GeoClient,
    workspace: &str,
    type_name: &str,
    property: &str,
) -> Result<Value, OgcError> {
    let query: Vec<(&str, &str)> = vec![
        ("SERVICE", "WFS"),
        ("VERSION", "2.0.0"),
        ("REQUEST", "GetPropertyValue"),
        ("TYPENAMES", type_name),
        ("VALUEREFERENCE", property),
    ];
    let resp = client.service_get(&endpoints::ows_service(workspace), &query)?;
    if resp.status >= 400 {
        return Err(OgcError::Service {
            status: resp.status,
            body: resp.body_text(),
        });
    }
    match Payload::from_bytes(&resp.body) {
        Payload::Json(value) => Ok(value),
        Payload::Text(text) => xml_to_value(&text),
    }
}

/// POST a WFS-T body and convert the transaction summary to a value.
pub fn transaction(client: &GeoClient, workspace: &str, body: &str) -> Result<Value, OgcError> {
    let resp = client.service_post(
        &endpoints::ows_service(workspace),
        "application/xml",
        body.as_bytes(),
    )?;
    if resp.status >= 400 {
        return Err(OgcError::Service {
            status: resp.status,
            body: resp.body_text(),
        });
    }
    match Payload::from_bytes(&resp.body) {
        Payload::Json(value) => Ok(value),
        Payload::Text(text) => xml_to_value(&text),
    }
}

/// One non-geometry attribute value for an insert transaction.
#[derive(Debug, Clone)]
pub struct FeatureAttribute {
    pub name: String,
    pub value: String,
}

impl FeatureAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Render a WFS-T insert body for one point feature.
pub fn insert_transaction(
    workspace: &str,
    type_name: &str,
    geometry_field: &str,
    point: (f64, f64),
    srid: u32,
    attributes: &[FeatureAttribute],
) -> String {
    let (x, y) = point;
    let mut fields = String::new();
    for attribute in attributes {
        fields.push_str(&format!(
            "      <{ws}:{name}>{value}</{ws}:{name}>\n",
            ws = workspace,
            name = attribute.name,
            value = xml_escape(&attribute.value),
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:Transaction service="WFS" version="2.0.0"
    xmlns:wfs="http://www.opengis.net/wfs/2.0"
    xmlns:gml="http://www.opengis.net/gml/3.2"
    xmlns:{ws}="{ws}">
  <wfs:Insert>
    <{ws}:{type_name}>
      <{ws}:{geometry_field}>
        <gml:Point srsName="urn:ogc:def:crs:EPSG::{srid}">
          <gml:pos>{x} {y}</gml:pos>
        </gml:Point>
      </{ws}:{geometry_field}>
{fields}    </{ws}:{type_name}>
  </wfs:Insert>
</wfs:Transaction>
"#,
        ws = workspace,
    )
}

/// Render a WFS-T delete body filtering on one property value.
pub fn delete_transaction(
    workspace: &str,
    type_name: &str,
    property: &str,
    value: &str,
) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:Transaction service="WFS" version="2.0.0"
    xmlns:wfs="http://www.opengis.net/wfs/2.0"
    xmlns:fes="http://www.opengis.net/fes/2.0"
    xmlns:{ws}="{ws}">
  <wfs:Delete typeName="{ws}:{type_name}">
    <fes:Filter>
      <fes:PropertyIsEqualTo>
        <fes:ValueReference>{property}</fes:ValueReference>
        <fes:Literal>{value}</fes:Literal>
      </fes:PropertyIsEqualTo>
    </fes:Filter>
  </wfs:Delete>
</wfs:Transaction>
"#,
        ws = workspace,
        value = xml_escape(value),
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
