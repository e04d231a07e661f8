//! Per-workspace OGC service settings overrides.

use crate::{name_ref, unwrap_root, ModelError};
use serde_json::{json, Map, Value};

/// Per-workspace WMS service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmsSettings {
    pub workspace: String,
    pub enabled: bool,
    pub default_locale: Option<String>,
}

impl WmsSettings {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            enabled: true,
            default_locale: None,
        }
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn put_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("workspace".to_owned(), json!({"name": self.workspace}));
        obj.insert("name".to_owned(), json!("WMS"));
        obj.insert("enabled".to_owned(), json!(self.enabled));
        if let Some(locale) = &self.default_locale {
            obj.insert("defaultLocale".to_owned(), json!(locale));
        }
        json!({ "wms": obj })
    }

    pub fn post_payload(&self) -> Value {
        self.put_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "wms")?;
        Ok(Self {
            workspace: name_ref(obj, "workspace").unwrap_or_default(),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            default_locale: obj
                .get("defaultLocale")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }
}

/// Per-workspace WFS service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WfsSettings {
    pub workspace: String,
    pub enabled: bool,
    pub default_locale: Option<String>,
}

impl WfsSettings {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            enabled: true,
            default_locale: None,
        }
    }

    #[must_use]
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    pub fn put_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("workspace".to_owned(), json!({"name": self.workspace}));
        obj.insert("name".to_owned(), json!("WFS"));
        obj.insert("enabled".to_owned(), json!(self.enabled));
        if let Some(locale) = &self.default_locale {
            obj.insert("defaultLocale".to_owned(), json!(locale));
        }
        json!({ "wfs": obj })
    }

    pub fn post_payload(&self) -> Value {
        self.put_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "wfs")?;
        Ok(Self {
            workspace: name_ref(obj, "workspace").unwrap_or_default(),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            default_locale: obj
                .get("defaultLocale")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wms_settings_roundtrip() {
        let settings = WmsSettings::new("demo").with_default_locale("de");
        let payload = settings.put_payload();
        assert_eq!(payload["wms"]["defaultLocale"], "de");
        assert_eq!(payload["wms"]["workspace"]["name"], "demo");
        let back = WmsSettings::from_get_response(&payload).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn wfs_settings_omit_unset_locale() {
        let payload = WfsSettings::new("demo").put_payload();
        assert!(payload["wfs"].get("defaultLocale").is_none());
        let back = WfsSettings::from_get_response(&payload).unwrap();
        assert!(back.default_locale.is_none());
    }
}
