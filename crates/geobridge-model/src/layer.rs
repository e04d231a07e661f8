//! Published layers and cascaded WMS/WMTS stores.

use crate::bbox::BoundingBox;
use crate::i18n::I18nText;
use crate::{name_ref, require_str, unwrap_root, ModelError};
use serde_json::{json, Map, Value};

/// The publishing record tying a resource (feature type or coverage) to its
/// default style and visibility flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    /// `VECTOR`, `RASTER`, `WMS` or `WMTS` on the wire.
    pub layer_type: Option<String>,
    pub default_style: Option<String>,
    /// Qualified resource reference (`workspace:name`) with its wire `@class`.
    pub resource_name: Option<String>,
    pub resource_class: Option<String>,
    pub enabled: bool,
    pub advertised: bool,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layer_type: None,
            default_style: None,
            resource_name: None,
            resource_class: None,
            enabled: true,
            advertised: true,
        }
    }

    #[must_use]
    pub fn with_default_style(mut self, style: impl Into<String>) -> Self {
        self.default_style = Some(style.into());
        self
    }

    pub fn put_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_owned(), json!(self.name));
        if let Some(layer_type) = &self.layer_type {
            obj.insert("type".to_owned(), json!(layer_type));
        }
        if let Some(style) = &self.default_style {
            obj.insert("defaultStyle".to_owned(), json!({"name": style}));
        }
        if let Some(resource) = &self.resource_name {
            let mut res = Map::new();
            if let Some(class) = &self.resource_class {
                res.insert("@class".to_owned(), json!(class));
            }
            res.insert("name".to_owned(), json!(resource));
            obj.insert("resource".to_owned(), Value::Object(res));
        }
        obj.insert("enabled".to_owned(), json!(self.enabled));
        obj.insert("advertised".to_owned(), json!(self.advertised));
        json!({ "layer": obj })
    }

    /// Layers are created implicitly when their resource is published; the
    /// only direct write the server accepts is a PUT.
    pub fn post_payload(&self) -> Value {
        self.put_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "layer")?;
        Ok(Self {
            name: require_str(obj, "layer", "name")?,
            layer_type: obj.get("type").and_then(Value::as_str).map(str::to_owned),
            default_style: name_ref(obj, "defaultStyle"),
            resource_name: name_ref(obj, "resource"),
            resource_class: obj
                .get("resource")
                .and_then(|r| r.get("@class"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            advertised: obj
                .get("advertised")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        })
    }
}

/// A cascaded remote WMS endpoint registered as a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsStore {
    pub workspace: String,
    pub name: String,
    pub capabilities_url: String,
    pub enabled: bool,
}

impl WmsStore {
    pub fn new(
        workspace: impl Into<String>,
        name: impl Into<String>,
        capabilities_url: impl Into<String>,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            name: name.into(),
            capabilities_url: capabilities_url.into(),
            enabled: true,
        }
    }

    pub fn post_payload(&self) -> Value {
        json!({
            "wmsStore": {
                "name": self.name,
                "type": "WMS",
                "enabled": self.enabled,
                "workspace": {"name": self.workspace},
                "capabilitiesURL": self.capabilities_url,
            }
        })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "wmsStore")?;
        Ok(Self {
            workspace: name_ref(obj, "workspace").unwrap_or_default(),
            name: require_str(obj, "wmsStore", "name")?,
            capabilities_url: require_str(obj, "wmsStore", "capabilitiesURL")?,
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}

/// A layer cascaded from a remote WMS store.
#[derive(Debug, Clone, PartialEq)]
pub struct WmsLayer {
    pub workspace: String,
    pub store: String,
    pub name: String,
    pub native_name: String,
    pub title: Option<I18nText>,
    pub abstract_: Option<I18nText>,
    pub lat_lon_bounding_box: Option<BoundingBox>,
    pub enabled: bool,
    pub advertised: bool,
}

impl WmsLayer {
    pub fn new(
        workspace: impl Into<String>,
        store: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            workspace: workspace.into(),
            store: store.into(),
            native_name: name.clone(),
            name,
            title: None,
            abstract_: None,
            lat_lon_bounding_box: None,
            enabled: true,
            advertised: true,
        }
    }

    #[must_use]
    pub fn with_native_name(mut self, native_name: impl Into<String>) -> Self {
        self.native_name = native_name.into();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<I18nText>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn post_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_owned(), json!(self.name));
        obj.insert("nativeName".to_owned(), json!(self.native_name));
        obj.insert("enabled".to_owned(), json!(self.enabled));
        obj.insert("advertised".to_owned(), json!(self.advertised));
        if let Some(title) = &self.title {
            title.write_into(&mut obj, "title", "internationalTitle");
        }
        if let Some(text) = &self.abstract_ {
            text.write_into(&mut obj, "abstract", "internationalAbstract");
        }
        if let Some(bbox) = &self.lat_lon_bounding_box {
            obj.insert("latLonBoundingBox".to_owned(), bbox.to_value());
        }
        obj.insert(
            "store".to_owned(),
            json!({"name": format!("{}:{}", self.workspace, self.store)}),
        );
        json!({ "wmsLayer": obj })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "wmsLayer")?;
        let name = require_str(obj, "wmsLayer", "name")?;
        let store_ref = name_ref(obj, "store").unwrap_or_default();
        let (workspace, store) = match store_ref.split_once(':') {
            Some((ws, store)) => (ws.to_owned(), store.to_owned()),
            None => (String::new(), store_ref),
        };
        Ok(Self {
            workspace,
            store,
            native_name: obj
                .get("nativeName")
                .and_then(Value::as_str)
                .unwrap_or(&name)
                .to_owned(),
            name,
            title: I18nText::read_from(obj, "title", "internationalTitle"),
            abstract_: I18nText::read_from(obj, "abstract", "internationalAbstract"),
            lat_lon_bounding_box: obj.get("latLonBoundingBox").and_then(BoundingBox::from_value),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            advertised: obj
                .get("advertised")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        })
    }
}

/// A cascaded remote WMTS endpoint registered as a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmtsStore {
    pub workspace: String,
    pub name: String,
    pub capabilities_url: String,
    pub enabled: bool,
}

impl WmtsStore {
    pub fn new(
        workspace: impl Into<String>,
        name: impl Into<String>,
        capabilities_url: impl Into<String>,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            name: name.into(),
            capabilities_url: capabilities_url.into(),
            enabled: true,
        }
    }

    pub fn post_payload(&self) -> Value {
        json!({
            "wmtsStore": {
                "name": self.name,
                "type": "WMTS",
                "enabled": self.enabled,
                "workspace": {"name": self.workspace},
                "capabilitiesURL": self.capabilities_url,
            }
        })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "wmtsStore")?;
        Ok(Self {
            workspace: name_ref(obj, "workspace").unwrap_or_default(),
            name: require_str(obj, "wmtsStore", "name")?,
            capabilities_url: require_str(obj, "wmtsStore", "capabilitiesURL")?,
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}

/// A layer cascaded from a remote WMTS store.
#[derive(Debug, Clone, PartialEq)]
pub struct WmtsLayer {
    pub workspace: String,
    pub store: String,
    pub name: String,
    pub native_name: String,
    pub title: Option<I18nText>,
    pub enabled: bool,
}

impl WmtsLayer {
    pub fn new(
        workspace: impl Into<String>,
        store: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            workspace: workspace.into(),
            store: store.into(),
            native_name: name.clone(),
            name,
            title: None,
            enabled: true,
        }
    }

    pub fn post_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_owned(), json!(self.name));
        obj.insert("nativeName".to_owned(), json!(self.native_name));
        obj.insert("enabled".to_owned(), json!(self.enabled));
        if let Some(title) = &self.title {
            title.write_into(&mut obj, "title", "internationalTitle");
        }
        obj.insert(
            "store".to_owned(),
            json!({"name": format!("{}:{}", self.workspace, self.store)}),
        );
        json!({ "wmtsLayer": obj })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "wmtsLayer")?;
        let name = require_str(obj, "wmtsLayer", "name")?;
        let store_ref = name_ref(obj, "store").unwrap_or_default();
        let (workspace, store) = match store_ref.split_once(':') {
            Some((ws, store)) => (ws.to_owned(), store.to_owned()),
            None => (String::new(), store_ref),
        };
        Ok(Self {
            workspace,
            store,
            native_name: obj
                .get("nativeName")
                .and_then(Value::as_str)
                .unwrap_or(&name)
                .to_owned(),
            name,
            title: I18nText::read_from(obj, "title", "internationalTitle"),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_put_payload_shape() {
        let mut layer = Layer::new("rivers").with_default_style("blue_line");
        layer.resource_name = Some("demo:rivers".to_owned());
        layer.resource_class = Some("featureType".to_owned());
        let payload = layer.put_payload();
        assert_eq!(payload["layer"]["defaultStyle"]["name"], "blue_line");
        assert_eq!(payload["layer"]["resource"]["@class"], "featureType");
        assert_eq!(payload["layer"]["resource"]["name"], "demo:rivers");
    }

    #[test]
    fn layer_parse_with_href_references() {
        let doc = serde_json::json!({
            "layer": {
                "name": "rivers",
                "type": "VECTOR",
                "defaultStyle": {
                    "name": "blue_line",
                    "href": "http://src.local/rest/styles/blue_line.json"
                },
                "resource": {
                    "@class": "featureType",
                    "name": "demo:rivers",
                    "href": "http://src.local/rest/workspaces/demo/featuretypes/rivers.json"
                },
                "enabled": true,
                "advertised": false
            }
        });
        let layer = Layer::from_get_response(&doc).unwrap();
        assert_eq!(layer.default_style.as_deref(), Some("blue_line"));
        assert_eq!(layer.resource_name.as_deref(), Some("demo:rivers"));
        assert!(!layer.advertised);
    }

    #[test]
    fn wms_store_roundtrip() {
        let store = WmsStore::new("demo", "upstream", "https://wms.example.ch/?SERVICE=WMS");
        let back = WmsStore::from_get_response(&store.post_payload()).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn wms_layer_roundtrip_with_i18n() {
        let layer = WmsLayer::new("demo", "upstream", "cantons")
            .with_native_name("ch.swisstopo.cantons")
            .with_title(I18nText::localized([("de", "Kantone"), ("fr", "Cantons")]));
        let back = WmsLayer::from_get_response(&layer.post_payload()).unwrap();
        assert_eq!(back, layer);
    }

    #[test]
    fn wmts_layer_roundtrip() {
        let layer = WmtsLayer::new("demo", "tiles", "relief");
        let back = WmtsLayer::from_get_response(&layer.post_payload()).unwrap();
        assert_eq!(back, layer);
    }
}
