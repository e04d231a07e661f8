//! Layer groups: ordered compositions of layers published as one.

use crate::bbox::BoundingBox;
use crate::i18n::I18nText;
use crate::shapes::one_or_many;
use crate::{name_ref, require_str, unwrap_root, ModelError};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    pub workspace: String,
    pub name: String,
    /// Group mode tag: `SINGLE`, `NAMED`, `CONTAINER` or `EO`.
    pub mode: String,
    pub title: Option<I18nText>,
    pub abstract_: Option<I18nText>,
    /// Member layer references, in draw order.
    pub layers: Vec<String>,
    /// Style references positionally paired with `layers`; an empty string
    /// selects the member's default style.
    pub styles: Vec<String>,
    pub bounds: Option<BoundingBox>,
    pub enabled: bool,
    pub advertised: bool,
}

impl LayerGroup {
    pub fn new(workspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            name: name.into(),
            mode: "SINGLE".to_owned(),
            title: None,
            abstract_: None,
            layers: Vec::new(),
            styles: Vec::new(),
            bounds: None,
            enabled: true,
            advertised: true,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<I18nText>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a member layer with its positional style (empty for default).
    #[must_use]
    pub fn with_member(mut self, layer: impl Into<String>, style: impl Into<String>) -> Self {
        self.layers.push(layer.into());
        self.styles.push(style.into());
        self
    }

    pub fn post_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_owned(), json!(self.name));
        obj.insert("mode".to_owned(), json!(self.mode));
        obj.insert("enabled".to_owned(), json!(self.enabled));
        obj.insert("advertised".to_owned(), json!(self.advertised));
        obj.insert("workspace".to_owned(), json!({"name": self.workspace}));
        if let Some(title) = &self.title {
            title.write_into(&mut obj, "title", "internationalTitle");
        }
        if let Some(text) = &self.abstract_ {
            text.write_into(&mut obj, "abstract", "internationalAbstract");
        }
        if !self.layers.is_empty() {
            let published: Vec<Value> = self
                .layers
                .iter()
                .map(|l| json!({"@type": "layer", "name": l}))
                .collect();
            obj.insert("publishables".to_owned(), json!({"published": published}));
            let styles: Vec<Value> = self
                .styles
                .iter()
                .map(|s| {
                    if s.is_empty() {
                        json!("")
                    } else {
                        json!({"name": s})
                    }
                })
                .collect();
            obj.insert("styles".to_owned(), json!({"style": styles}));
        }
        if let Some(bounds) = &self.bounds {
            obj.insert("bounds".to_owned(), bounds.to_value());
        }
        json!({ "layerGroup": obj })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "layerGroup")?;
        let layers = one_or_many(obj.get("publishables").and_then(|p| p.get("published")))
            .iter()
            .filter_map(|m| m.get("name").and_then(Value::as_str).map(str::to_owned))
            .collect();
        let styles = one_or_many(obj.get("styles").and_then(|s| s.get("style")))
            .iter()
            .map(|s| match s {
                Value::String(text) => text.clone(),
                Value::Object(o) => o
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned(),
                _ => String::new(),
            })
            .collect();
        Ok(Self {
            workspace: name_ref(obj, "workspace").unwrap_or_default(),
            name: require_str(obj, "layerGroup", "name")?,
            mode: obj
                .get("mode")
                .and_then(Value::as_str)
                .unwrap_or("SINGLE")
                .to_owned(),
            title: I18nText::read_from(obj, "title", "internationalTitle"),
            abstract_: I18nText::read_from(obj, "abstract", "internationalAbstract"),
            layers,
            styles,
            bounds: obj.get("bounds").and_then(BoundingBox::from_value),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            advertised: obj
                .get("advertised")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LayerGroup {
        LayerGroup::new("demo", "base_map")
            .with_title(I18nText::plain("Base map"))
            .with_member("demo:rivers", "blue_line")
            .with_member("demo:roads", "")
    }

    #[test]
    fn payload_pairs_layers_and_styles_positionally() {
        let payload = sample().post_payload();
        let group = &payload["layerGroup"];
        assert_eq!(group["mode"], "SINGLE");
        assert_eq!(group["publishables"]["published"][0]["name"], "demo:rivers");
        assert_eq!(group["publishables"]["published"][1]["name"], "demo:roads");
        assert_eq!(group["styles"]["style"][0]["name"], "blue_line");
        // Empty string keeps the member's default style.
        assert_eq!(group["styles"]["style"][1], "");
    }

    #[test]
    fn roundtrip() {
        let group = sample();
        let back = LayerGroup::from_get_response(&group.post_payload()).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn parse_single_member_as_object() {
        let doc = serde_json::json!({
            "layerGroup": {
                "name": "solo",
                "workspace": {"name": "demo"},
                "publishables": {"published": {"@type": "layer", "name": "demo:rivers"}},
                "styles": {"style": {"name": "blue_line"}}
            }
        });
        let group = LayerGroup::from_get_response(&doc).unwrap();
        assert_eq!(group.layers, vec!["demo:rivers"]);
        assert_eq!(group.styles, vec!["blue_line"]);
    }
}
