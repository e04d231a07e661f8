//! Style metadata records.
//!
//! The style's raw definition body (SLD XML, MBStyle JSON or a ZIP bundle) is
//! uploaded and downloaded separately from this metadata record; see the
//! client's style body operations.

use crate::{name_ref, require_str, unwrap_root, ModelError};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleFormat {
    Sld,
    Zip,
    MbStyle,
}

impl StyleFormat {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Sld => "sld",
            Self::Zip => "zip",
            Self::MbStyle => "mbstyle",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Sld => "application/vnd.ogc.sld+xml",
            Self::Zip => "application/zip",
            Self::MbStyle => "application/vnd.geoserver.mbstyle+json",
        }
    }

    fn from_tag(tag: &str) -> Self {
        match tag {
            "zip" => Self::Zip,
            "mbstyle" => Self::MbStyle,
            _ => Self::Sld,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    pub online_resource: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub name: String,
    pub workspace: Option<String>,
    pub format: StyleFormat,
    pub legend: Option<Legend>,
}

impl Style {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workspace: None,
            format: StyleFormat::Sld,
            legend: None,
        }
    }

    #[must_use]
    pub fn in_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: StyleFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = Some(legend);
        self
    }

    pub fn filename(&self) -> String {
        format!("{}.{}", self.name, self.format.tag())
    }

    pub fn post_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_owned(), json!(self.name));
        obj.insert("format".to_owned(), json!(self.format.tag()));
        obj.insert("filename".to_owned(), json!(self.filename()));
        if let Some(workspace) = &self.workspace {
            obj.insert("workspace".to_owned(), json!({"name": workspace}));
        }
        if let Some(legend) = &self.legend {
            obj.insert(
                "legend".to_owned(),
                json!({
                    "onlineResource": legend.online_resource,
                    "format": legend.format,
                    "width": legend.width,
                    "height": legend.height,
                }),
            );
        }
        json!({ "style": obj })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "style")?;
        let legend = obj.get("legend").and_then(|l| {
            Some(Legend {
                online_resource: l.get("onlineResource")?.as_str()?.to_owned(),
                format: l
                    .get("format")
                    .and_then(Value::as_str)
                    .unwrap_or("image/png")
                    .to_owned(),
                width: l.get("width").and_then(Value::as_u64).unwrap_or(0) as u32,
                height: l.get("height").and_then(Value::as_u64).unwrap_or(0) as u32,
            })
        });
        Ok(Self {
            name: require_str(obj, "style", "name")?,
            workspace: name_ref(obj, "workspace"),
            format: obj
                .get("format")
                .and_then(Value::as_str)
                .map(StyleFormat::from_tag)
                .unwrap_or(StyleFormat::Sld),
            legend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape_with_legend() {
        let style = Style::new("roads")
            .in_workspace("demo")
            .with_legend(Legend {
                online_resource: "roads_legend.png".to_owned(),
                format: "image/png".to_owned(),
                width: 32,
                height: 32,
            });
        let payload = style.post_payload();
        assert_eq!(payload["style"]["name"], "roads");
        assert_eq!(payload["style"]["filename"], "roads.sld");
        assert_eq!(payload["style"]["workspace"]["name"], "demo");
        assert_eq!(payload["style"]["legend"]["width"], 32);
    }

    #[test]
    fn global_style_omits_workspace() {
        let payload = Style::new("default").post_payload();
        assert!(payload["style"].get("workspace").is_none());
    }

    #[test]
    fn roundtrip() {
        let style = Style::new("roads")
            .in_workspace("demo")
            .with_format(StyleFormat::MbStyle);
        let back = Style::from_get_response(&style.post_payload()).unwrap();
        assert_eq!(back, style);
        assert_eq!(back.filename(), "roads.mbstyle");
    }
}
