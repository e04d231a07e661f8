//! Published vector layers (feature types).

use crate::bbox::BoundingBox;
use crate::i18n::I18nText;
use crate::shapes::{one_or_many, string_list};
use crate::{name_ref, require_str, unwrap_root, ModelError};
use serde_json::{json, Map, Value};

/// One attribute of a feature type schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Java binding class on the wire, e.g. `org.locationtech.jts.geom.Point`.
    pub binding: String,
    pub nillable: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, binding: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binding: binding.into(),
            nillable: true,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.nillable = false;
        self
    }

    fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "binding": self.binding,
            "nillable": self.nillable,
        })
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            name: value.get("name")?.as_str()?.to_owned(),
            binding: value
                .get("binding")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            nillable: value.get("nillable").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLink {
    pub mime_type: String,
    pub metadata_type: String,
    pub content: String,
}

impl MetadataLink {
    fn to_value(&self) -> Value {
        json!({
            "type": self.mime_type,
            "metadataType": self.metadata_type,
            "content": self.content,
        })
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            mime_type: value.get("type")?.as_str()?.to_owned(),
            metadata_type: value
                .get("metadataType")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            content: value.get("content")?.as_str()?.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureType {
    pub workspace: String,
    pub store: String,
    pub name: String,
    pub native_name: String,
    pub srs: Option<String>,
    pub title: Option<I18nText>,
    pub abstract_: Option<I18nText>,
    pub keywords: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub native_bounding_box: Option<BoundingBox>,
    pub lat_lon_bounding_box: Option<BoundingBox>,
    pub metadata_links: Vec<MetadataLink>,
    pub enabled: bool,
}

impl FeatureType {
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
            srs: None,
            title: None,
            abstract_: None,
            keywords: Vec::new(),
            attributes: Vec::new(),
            native_bounding_box: None,
            lat_lon_bounding_box: None,
            metadata_links: Vec::new(),
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_native_name(mut self, native_name: impl Into<String>) -> Self {
        self.native_name = native_name.into();
        self
    }

    #[must_use]
    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = Some(srs.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<I18nText>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_abstract(mut self, text: impl Into<I18nText>) -> Self {
        self.abstract_ = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Qualified store reference (`workspace:store`) used by layer documents.
    pub fn qualified_store(&self) -> String {
        format!("{}:{}", self.workspace, self.store)
    }

    pub fn post_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_owned(), json!(self.name));
        obj.insert("nativeName".to_owned(), json!(self.native_name));
        obj.insert("enabled".to_owned(), json!(self.enabled));
        if let Some(srs) = &self.srs {
            obj.insert("srs".to_owned(), json!(srs));
        }
        if let Some(title) = &self.title {
            title.write_into(&mut obj, "title", "internationalTitle");
        }
        if let Some(text) = &self.abstract_ {
            text.write_into(&mut obj, "abstract", "internationalAbstract");
        }
        if !self.keywords.is_empty() {
            obj.insert("keywords".to_owned(), json!({"string": self.keywords}));
        }
        if !self.attributes.is_empty() {
            let attrs: Vec<Value> = self.attributes.iter().map(Attribute::to_value).collect();
            obj.insert("attributes".to_owned(), json!({"attribute": attrs}));
        }
        if let Some(bbox) = &self.native_bounding_box {
            obj.insert("nativeBoundingBox".to_owned(), bbox.to_value());
        }
        if let Some(bbox) = &self.lat_lon_bounding_box {
            obj.insert("latLonBoundingBox".to_owned(), bbox.to_value());
        }
        if !self.metadata_links.is_empty() {
            let links: Vec<Value> = self
                .metadata_links
                .iter()
                .map(MetadataLink::to_value)
                .collect();
            obj.insert("metadataLinks".to_owned(), json!({"metadataLink": links}));
        }
        obj.insert("store".to_owned(), json!({"name": self.qualified_store()}));
        obj.insert("namespace".to_owned(), json!({"name": self.workspace}));
        json!({ "featureType": obj })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "featureType")?;
        let name = require_str(obj, "featureType", "name")?;

        // Store references come back qualified ("ws:store"); split them.
        let store_ref = name_ref(obj, "store").unwrap_or_default();
        let (ws_from_store, store) = match store_ref.split_once(':') {
            Some((ws, store)) => (Some(ws.to_owned()), store.to_owned()),
            None => (None, store_ref),
        };
        let workspace = name_ref(obj, "namespace")
            .or(ws_from_store)
            .unwrap_or_default();

        let attributes = one_or_many(obj.get("attributes").and_then(|a| a.get("attribute")))
            .iter()
            .filter_map(Attribute::from_value)
            .collect();
        let metadata_links =
            one_or_many(obj.get("metadataLinks").and_then(|m| m.get("metadataLink")))
                .iter()
                .filter_map(MetadataLink::from_value)
                .collect();

        Ok(Self {
            workspace,
            store,
            native_name: obj
                .get("nativeName")
                .and_then(Value::as_str)
                .unwrap_or(&name)
                .to_owned(),
            name,
            srs: obj.get("srs").and_then(Value::as_str).map(str::to_owned),
            title: I18nText::read_from(obj, "title", "internationalTitle"),
            abstract_: I18nText::read_from(obj, "abstract", "internationalAbstract"),
            keywords: string_list(obj.get("keywords"), "string"),
            attributes,
            native_bounding_box: obj.get("nativeBoundingBox").and_then(BoundingBox::from_value),
            lat_lon_bounding_box: obj.get("latLonBoundingBox").and_then(BoundingBox::from_value),
            metadata_links,
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::CrsRef;

    fn sample() -> FeatureType {
        FeatureType::new("demo", "pg", "rivers")
            .with_native_name("rivers_table")
            .with_srs("EPSG:2056")
            .with_title(I18nText::localized([("de", "Flüsse"), ("fr", "Rivières")]))
            .with_attribute(Attribute::new("geom", "org.locationtech.jts.geom.Point").required())
            .with_attribute(Attribute::new("id", "java.lang.Integer").required())
            .with_attribute(Attribute::new("title", "java.lang.String"))
    }

    #[test]
    fn payload_shape() {
        let payload = sample().post_payload();
        let ft = &payload["featureType"];
        assert_eq!(ft["name"], "rivers");
        assert_eq!(ft["nativeName"], "rivers_table");
        assert_eq!(ft["store"]["name"], "demo:pg");
        assert_eq!(ft["namespace"]["name"], "demo");
        assert_eq!(ft["internationalTitle"]["de"], "Flüsse");
        assert_eq!(ft["attributes"]["attribute"][0]["nillable"], false);
        assert!(ft.get("title").is_none());
        assert!(ft.get("srs").is_some());
    }

    #[test]
    fn roundtrip_i18n_and_attributes() {
        let ft = sample();
        let back = FeatureType::from_get_response(&ft.post_payload()).unwrap();
        assert_eq!(back, ft);
    }

    #[test]
    fn parse_single_attribute_object() {
        let doc = serde_json::json!({
            "featureType": {
                "name": "single",
                "store": {"name": "demo:pg"},
                "attributes": {"attribute": {"name": "geom", "binding": "x", "nillable": true}}
            }
        });
        let ft = FeatureType::from_get_response(&doc).unwrap();
        assert_eq!(ft.attributes.len(), 1);
        assert_eq!(ft.workspace, "demo");
        assert_eq!(ft.store, "pg");
    }

    #[test]
    fn bounding_boxes_roundtrip() {
        let mut ft = sample();
        ft.native_bounding_box = Some(BoundingBox::new(
            2_500_000.0,
            1_100_000.0,
            2_700_000.0,
            1_300_000.0,
            Some(CrsRef::projected("EPSG:2056")),
        ));
        ft.lat_lon_bounding_box = Some(BoundingBox::new(
            5.9,
            45.8,
            10.5,
            47.8,
            Some(CrsRef::epsg(4326)),
        ));
        let back = FeatureType::from_get_response(&ft.post_payload()).unwrap();
        assert_eq!(back.native_bounding_box, ft.native_bounding_box);
        assert_eq!(back.lat_lon_bounding_box, ft.lat_lon_bounding_box);
    }

    #[test]
    fn plain_title_keeps_plain_key() {
        let ft = FeatureType::new("demo", "pg", "plain").with_title("Rivers");
        let payload = ft.post_payload();
        assert_eq!(payload["featureType"]["title"], "Rivers");
        assert!(payload["featureType"].get("internationalTitle").is_none());
    }
}
