//! OGC service endpoints: workspace WMS/WFS and the tile service.

use crate::catalog::Catalog;
use crate::transaction::{parse_transaction, TransactionOp};
use crate::{query_params, read_body, respond_err, respond_raw, respond_json};
use serde_json::{json, Map, Value};
use tiny_http::Method;

/// Emitted in place of a title when neither the requested language nor any
/// fallback has content for the element.
pub const I18N_CONTENT_MISSING: &str = "DID NOT FIND i18n CONTENT FOR THIS ELEMENT";

/// Minimal valid PNG header; enough for clients that only check magic bytes.
const PNG_STUB: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn respond_exception(req: tiny_http::Request, status: u16, code: &str, message: &str) {
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.3.0">
  <ServiceException code="{code}">{}</ServiceException>
</ServiceExceptionReport>"#,
        xml_escape(message),
    );
    respond_raw(req, status, "text/xml", body.into_bytes());
}

/// `/{workspace}/wms`
pub fn handle_wms(catalog: &Catalog, req: tiny_http::Request, workspace: &str, query: &str) {
    let params = query_params(query);
    match param(&params, "REQUEST") {
        Some(r) if r.eq_ignore_ascii_case("GetCapabilities") => {
            capabilities(catalog, req, workspace, &params);
        }
        Some(r) if r.eq_ignore_ascii_case("GetMap") => {
            let layers = param(&params, "LAYERS").unwrap_or("");
            for layer in layers.split(',').filter(|l| !l.is_empty()) {
                if !layer_known(catalog, workspace, layer) {
                    respond_exception(
                        req,
                        400,
                        "LayerNotDefined",
                        &format!("layer '{layer}' is not defined"),
                    );
                    return;
                }
            }
            respond_raw(req, 200, "image/png", PNG_STUB.to_vec());
        }
        Some(r) if r.eq_ignore_ascii_case("GetFeatureInfo") => {
            feature_info(catalog, req, workspace, &params);
        }
        Some(r) if r.eq_ignore_ascii_case("GetLegendGraphic") => {
            let layer = param(&params, "LAYER").unwrap_or("");
            if layer_known(catalog, workspace, layer) {
                respond_raw(req, 200, "image/png", PNG_STUB.to_vec());
            } else {
                respond_exception(
                    req,
                    400,
                    "LayerNotDefined",
                    &format!("layer '{layer}' is not defined"),
                );
            }
        }
        _ => respond_exception(req, 400, "InvalidRequest", "unsupported WMS request"),
    }
}

fn layer_known(catalog: &Catalog, workspace: &str, layer: &str) -> bool {
    let local = layer.strip_prefix(&format!("{workspace}:")).unwrap_or(layer);
    catalog.has_layer(workspace, local)
}

fn capabilities(
    catalog: &Catalog,
    req: tiny_http::Request,
    workspace: &str,
    params: &[(String, String)],
) {
    let resources = match catalog.published_resources(workspace) {
        Ok(docs) => docs,
        Err(_) => {
            respond_exception(req, 404, "InvalidParameterValue", "no such workspace");
            return;
        }
    };
    let accept: Vec<String> = param(params, "ACCEPTLANGUAGES")
        .map(|langs| {
            langs
                .split([',', ' '])
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    let default_locale = catalog.get_wms_default_locale(workspace);

    let mut layers_xml = String::new();
    for doc in &resources {
        let Some(name) = doc.get("name").and_then(Value::as_str) else {
            continue;
        };
        let title = resolve_title(doc, &accept, default_locale.as_deref())
            .unwrap_or_else(|| name.to_owned());
        layers_xml.push_str(&format!(
            "      <Layer queryable=\"1\">\n        <Name>{workspace}:{}</Name>\n        <Title>{}</Title>\n",
            xml_escape(name),
            xml_escape(&title),
        ));
        if let Some(bbox) = doc.get("latLonBoundingBox") {
            let bound = |key: &str| bbox.get(key).and_then(Value::as_f64).unwrap_or(0.0);
            layers_xml.push_str(&format!(
                "        <EX_GeographicBoundingBox>\n          <westBoundLongitude>{}</westBoundLongitude>\n          <eastBoundLongitude>{}</eastBoundLongitude>\n          <southBoundLatitude>{}</southBoundLatitude>\n          <northBoundLatitude>{}</northBoundLatitude>\n        </EX_GeographicBoundingBox>\n",
                bound("minx"),
                bound("maxx"),
                bound("miny"),
                bound("maxy"),
            ));
        }
        layers_xml.push_str("      </Layer>\n");
    }

    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0">
  <Service>
    <Name>WMS</Name>
    <Title>{workspace}</Title>
  </Service>
  <Capability>
    <Layer>
      <Title>{workspace}</Title>
{layers_xml}    </Layer>
  </Capability>
</WMS_Capabilities>"#,
    );
    respond_raw(req, 200, "text/xml", body.into_bytes());
}

/// Title fallback chain: requested languages in order, the plain default
/// title, the workspace WMS default locale, then the literal marker when a
/// localized title exists but nothing matched.
fn resolve_title(doc: &Value, accept: &[String], default_locale: Option<&str>) -> Option<String> {
    let localized = doc.get("internationalTitle").and_then(Value::as_object);
    if let Some(map) = localized {
        for lang in accept {
            if let Some(title) = map.get(lang).and_then(Value::as_str) {
                return Some(title.to_owned());
            }
        }
    }
    if let Some(title) = doc.get("title").and_then(Value::as_str) {
        return Some(title.to_owned());
    }
    if let Some(map) = localized {
        if let Some(title) = default_locale
            .and_then(|locale| map.get(locale))
            .and_then(Value::as_str)
        {
            return Some(title.to_owned());
        }
        if !map.is_empty() {
            return Some(I18N_CONTENT_MISSING.to_owned());
        }
    }
    None
}

fn feature_info(
    catalog: &Catalog,
    req: tiny_http::Request,
    workspace: &str,
    params: &[(String, String)],
) {
    let layers = param(params, "QUERY_LAYERS")
        .or_else(|| param(params, "LAYERS"))
        .unwrap_or("");
    let Some(layer) = layers.split(',').next().filter(|l| !l.is_empty()) else {
        respond_exception(req, 400, "MissingParameterValue", "QUERY_LAYERS is required");
        return;
    };
    let local = layer.strip_prefix(&format!("{workspace}:")).unwrap_or(layer);
    let count = param(params, "FEATURE_COUNT")
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(10);
    match catalog.list_features(workspace, local) {
        Ok(features) => {
            let limited: Vec<Value> = features.into_iter().take(count).collect();
            respond_json(req, feature_collection(limited));
        }
        Err(_) => respond_exception(
            req,
            400,
            "LayerNotDefined",
            &format!("layer '{layer}' is not defined"),
        ),
    }
}

fn feature_collection(features: Vec<Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "totalFeatures": features.len(),
        "numberReturned": features.len(),
        "features": features,
    })
}

/// `/{workspace}/ows` (WFS)
pub fn handle_wfs(
    catalog: &Catalog,
    mut req: tiny_http::Request,
    workspace: &str,
    query: &str,
) {
    let method = req.method().clone();
    if method == Method::Post {
        let Some(body) = read_body(&mut req) else {
            respond_err(req, 500, "read error");
            return;
        };
        let body = String::from_utf8_lossy(&body).into_owned();
        run_transaction(catalog, req, workspace, &body);
        return;
    }

    let params = query_params(query);
    match param(&params, "REQUEST") {
        Some(r) if r.eq_ignore_ascii_case("GetFeature") => {
            let type_name = param(&params, "TYPENAMES")
                .or_else(|| param(&params, "TYPENAME"))
                .unwrap_or("");
            let local = type_name
                .strip_prefix(&format!("{workspace}:"))
                .unwrap_or(type_name);
            let count = param(&params, "COUNT").and_then(|c| c.parse::<usize>().ok());
            match catalog.list_features(workspace, local) {
                Ok(features) => {
                    let limited: Vec<Value> = match count {
                        Some(n) => features.into_iter().take(n).collect(),
                        None => features,
                    };
                    respond_json(req, feature_collection(limited));
                }
                Err(_) => respond_exception(
                    req,
                    400,
                    "InvalidParameterValue",
                    &format!("feature type '{type_name}' is not defined"),
                ),
            }
        }
        Some(r) if r.eq_ignore_ascii_case("DescribeFeatureType") => {
            describe_feature_type(catalog, req, workspace, &params);
        }
        Some(r) if r.eq_ignore_ascii_case("GetPropertyValue") => {
            property_value(catalog, req, workspace, &params);
        }
        _ => respond_exception(req, 400, "InvalidRequest", "unsupported WFS request"),
    }
}

fn describe_feature_type(
    catalog: &Catalog,
    req: tiny_http::Request,
    workspace: &str,
    params: &[(String, String)],
) {
    let resources = match catalog.published_resources(workspace) {
        Ok(docs) => docs,
        Err(_) => {
            respond_exception(req, 404, "InvalidParameterValue", "no such workspace");
            return;
        }
    };
    let wanted = param(params, "TYPENAMES")
        .or_else(|| param(params, "TYPENAME"))
        .map(|t| {
            t.strip_prefix(&format!("{workspace}:"))
                .unwrap_or(t)
                .to_owned()
        });

    let mut types_xml = String::new();
    for doc in &resources {
        let Some(name) = doc.get("name").and_then(Value::as_str) else {
            continue;
        };
        if wanted.as_deref().is_some_and(|w| w != name) {
            continue;
        }
        types_xml.push_str(&format!("  <ComplexType name=\"{}\">\n", xml_escape(name)));
        let attributes = doc
            .get("attributes")
            .and_then(|a| a.get("attribute"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for attribute in &attributes {
            let attr_name = attribute.get("name").and_then(Value::as_str).unwrap_or("");
            let binding = attribute
                .get("binding")
                .and_then(Value::as_str)
                .unwrap_or("");
            types_xml.push_str(&format!(
                "    <Element name=\"{}\" type=\"{}\"/>\n",
                xml_escape(attr_name),
                xml_escape(binding),
            ));
        }
        types_xml.push_str("  </ComplexType>\n");
    }
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Schema targetNamespace=\"{workspace}\">\n{types_xml}</Schema>",
    );
    respond_raw(req, 200, "text/xml", body.into_bytes());
}

fn property_value(
    catalog: &Catalog,
    req: tiny_http::Request,
    workspace: &str,
    params: &[(String, String)],
) {
    let type_name = param(params, "TYPENAMES")
        .or_else(|| param(params, "TYPENAME"))
        .unwrap_or("");
    let local = type_name
        .strip_prefix(&format!("{workspace}:"))
        .unwrap_or(type_name);
    let Some(property) = param(params, "VALUEREFERENCE") else {
        respond_exception(req, 400, "MissingParameterValue", "VALUEREFERENCE is required");
        return;
    };
    match catalog.list_features(workspace, local) {
        Ok(features) => {
            let mut members = String::new();
            for feature in &features {
                if let Some(value) = feature.get("properties").and_then(|p| p.get(property)) {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    members.push_str(&format!(
                        "  <member><{property}>{}</{property}></member>\n",
                        xml_escape(&text),
                    ));
                }
            }
            let body = format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ValueCollection>\n{members}</ValueCollection>",
            );
            respond_raw(req, 200, "text/xml", body.into_bytes());
        }
        Err(_) => respond_exception(
            req,
            400,
            "InvalidParameterValue",
            &format!("feature type '{type_name}' is not defined"),
        ),
    }
}

fn run_transaction(catalog: &Catalog, req: tiny_http::Request, workspace: &str, body: &str) {
    let ops = match parse_transaction(body) {
        Ok(ops) => ops,
        Err(message) => {
            respond_exception(req, 400, "InvalidRequest", &message);
            return;
        }
    };

    let mut inserted = 0usize;
    let mut deleted = 0usize;
    for op in ops {
        match op {
            TransactionOp::Insert {
                type_name,
                point,
                properties,
            } => {
                let feature = build_feature(&type_name, point, &properties, inserted + 1);
                if catalog.insert_feature(workspace, &type_name, feature).is_err() {
                    respond_exception(
                        req,
                        400,
                        "InvalidParameterValue",
                        &format!("feature type '{type_name}' is not defined"),
                    );
                    return;
                }
                inserted += 1;
            }
            TransactionOp::Delete {
                type_name,
                property,
                literal,
            } => match catalog.delete_features(workspace, &type_name, &property, &literal) {
                Ok(count) => deleted += count,
                Err(_) => {
                    respond_exception(
                        req,
                        400,
                        "InvalidParameterValue",
                        &format!("feature type '{type_name}' is not defined"),
                    );
                    return;
                }
            },
        }
    }

    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<TransactionResponse version="2.0.0">
  <TransactionSummary>
    <totalInserted>{inserted}</totalInserted>
    <totalUpdated>0</totalUpdated>
    <totalDeleted>{deleted}</totalDeleted>
  </TransactionSummary>
</TransactionResponse>"#,
    );
    respond_raw(req, 200, "text/xml", body.into_bytes());
}

/// Scalar property text becomes a number when it parses as one.
fn build_feature(
    type_name: &str,
    point: Option<(f64, f64)>,
    properties: &[(String, String)],
    seq: usize,
) -> Value {
    let mut props = Map::new();
    for (name, text) in properties {
        let value = if let Ok(n) = text.parse::<i64>() {
            json!(n)
        } else if let Ok(n) = text.parse::<f64>() {
            json!(n)
        } else {
            json!(text)
        };
        props.insert(name.clone(), value);
    }
    let geometry = match point {
        Some((x, y)) => json!({"type": "Point", "coordinates": [x, y]}),
        None => Value::Null,
    };
    json!({
        "type": "Feature",
        "id": format!("{type_name}.{seq}"),
        "geometry": geometry,
        "properties": props,
    })
}

/// `/gwc/service/wmts`
pub fn handle_wmts(catalog: &Catalog, req: tiny_http::Request, query: &str) {
    let params = query_params(query);
    if !param(&params, "REQUEST").is_some_and(|r| r.eq_ignore_ascii_case("GetTile")) {
        respond_exception(req, 400, "InvalidRequest", "unsupported WMTS request");
        return;
    }
    let layer = param(&params, "LAYER").unwrap_or("");
    let Some((workspace, local)) = layer.split_once(':') else {
        respond_exception(req, 400, "InvalidParameterValue", "LAYER must be qualified");
        return;
    };
    if !catalog.has_layer(workspace, local) {
        respond_err(req, 404, "not found");
        return;
    }
    let tile_matrix = param(&params, "TILEMATRIX").unwrap_or("");
    let row = param(&params, "TILEROW").unwrap_or("0");
    let col = param(&params, "TILECOL").unwrap_or("0");
    let key = format!("{local}/{tile_matrix}/{row}/{col}");
    match catalog.fetch_tile(workspace, &key) {
        Ok(hit) => {
            let verdict = if hit { "HIT" } else { "MISS" };
            let header = tiny_http::Header::from_bytes("geowebcache-cache-result", verdict)
                .expect("valid header");
            let content_type = tiny_http::Header::from_bytes("Content-Type", "image/png")
                .expect("valid header");
            let response = tiny_http::Response::from_data(PNG_STUB.to_vec())
                .with_header(content_type)
                .with_header(header);
            let _ = req.respond(response);
        }
        Err(_) => respond_err(req, 404, "not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_language_wins() {
        let layer = json!({"internationalTitle": {"de": "Flüsse", "fr": "Rivières"}});
        assert_eq!(
            resolve_title(&layer, &["fr".to_owned()], None).as_deref(),
            Some("Rivières")
        );
    }

    #[test]
    fn plain_title_is_the_default() {
        let layer = json!({"title": "Rivers", "internationalTitle": {"de": "Flüsse"}});
        assert_eq!(
            resolve_title(&layer, &["rm".to_owned()], None).as_deref(),
            Some("Rivers")
        );
    }

    #[test]
    fn default_locale_applies_before_the_marker() {
        let layer = json!({"internationalTitle": {"de": "Flüsse"}});
        assert_eq!(
            resolve_title(&layer, &["rm".to_owned()], Some("de")).as_deref(),
            Some("Flüsse")
        );
    }

    #[test]
    fn marker_when_nothing_matches() {
        let layer = json!({"internationalTitle": {"de": "Flüsse"}});
        assert_eq!(
            resolve_title(&layer, &["rm".to_owned()], None).as_deref(),
            Some(I18N_CONTENT_MISSING)
        );
    }

    #[test]
    fn no_title_information_falls_back_to_none() {
        let layer = json!({"name": "rivers"});
        assert_eq!(resolve_title(&layer, &[], None), None);
    }

    #[test]
    fn numeric_properties_become_numbers() {
        let feature = build_feature(
            "rivers",
            Some((2_600_000.0, 1_200_000.0)),
            &[
                ("id".to_owned(), "10".to_owned()),
                ("title".to_owned(), "Title".to_owned()),
            ],
            1,
        );
        assert_eq!(feature["properties"]["id"], json!(10));
        assert_eq!(feature["properties"]["title"], json!("Title"));
        assert_eq!(feature["geometry"]["coordinates"], json!([2_600_000.0, 1_200_000.0]));
    }
}
