//! Raster stores and published coverages.

use crate::bbox::BoundingBox;
use crate::i18n::I18nText;
use crate::shapes::string_list;
use crate::{name_ref, require_str, unwrap_root, ModelError};
use serde_json::{json, Map, Value};

/// A raster source configuration (GeoTIFF, ImageMosaic, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageStore {
    pub workspace: String,
    pub name: String,
    /// Raster format tag, e.g. `GeoTIFF` or `ImageMosaic`.
    pub format: String,
    /// Location of the raster source (`file:...` URL or uploaded archive path).
    pub url: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
}

impl CoverageStore {
    pub fn new(
        workspace: impl Into<String>,
        name: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            name: name.into(),
            format: format.into(),
            url: None,
            description: None,
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn post_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_owned(), json!(self.name));
        obj.insert("type".to_owned(), json!(self.format));
        obj.insert("enabled".to_owned(), json!(self.enabled));
        if let Some(url) = &self.url {
            obj.insert("url".to_owned(), json!(url));
        }
        if let Some(description) = &self.description {
            obj.insert("description".to_owned(), json!(description));
        }
        obj.insert("workspace".to_owned(), json!({"name": self.workspace}));
        json!({ "coverageStore": obj })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "coverageStore")?;
        Ok(Self {
            workspace: name_ref(obj, "workspace").unwrap_or_default(),
            name: require_str(obj, "coverageStore", "name")?,
            format: obj
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            url: obj.get("url").and_then(Value::as_str).map(str::to_owned),
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_owned),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}

/// A published raster layer backed by a coverage store.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    pub workspace: String,
    pub store: String,
    pub name: String,
    pub native_name: String,
    pub srs: Option<String>,
    pub title: Option<I18nText>,
    pub abstract_: Option<I18nText>,
    pub keywords: Vec<String>,
    pub native_bounding_box: Option<BoundingBox>,
    pub lat_lon_bounding_box: Option<BoundingBox>,
    pub enabled: bool,
}

impl Coverage {
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
            native_bounding_box: None,
            lat_lon_bounding_box: None,
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<I18nText>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_srs(mut self, srs: impl Into<String>) -> Self {
        self.srs = Some(srs.into());
        self
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
        if let Some(bbox) = &self.native_bounding_box {
            obj.insert("nativeBoundingBox".to_owned(), bbox.to_value());
        }
        if let Some(bbox) = &self.lat_lon_bounding_box {
            obj.insert("latLonBoundingBox".to_owned(), bbox.to_value());
        }
        obj.insert(
            "store".to_owned(),
            json!({"name": format!("{}:{}", self.workspace, self.store)}),
        );
        json!({ "coverage": obj })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "coverage")?;
        let name = require_str(obj, "coverage", "name")?;
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
            srs: obj.get("srs").and_then(Value::as_str).map(str::to_owned),
            title: I18nText::read_from(obj, "title", "internationalTitle"),
            abstract_: I18nText::read_from(obj, "abstract", "internationalAbstract"),
            keywords: string_list(obj.get("keywords"), "string"),
            native_bounding_box: obj.get("nativeBoundingBox").and_then(BoundingBox::from_value),
            lat_lon_bounding_box: obj.get("latLonBoundingBox").and_then(BoundingBox::from_value),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        })
    }
}
