//! Workspace resource.

use crate::{require_str, unwrap_root, ModelError};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub name: String,
    pub isolated: bool,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            isolated: false,
        }
    }

    #[must_use]
    pub fn isolated(mut self) -> Self {
        self.isolated = true;
        self
    }

    pub fn post_payload(&self) -> Value {
        json!({
            "workspace": {
                "name": self.name,
                "isolated": self.isolated,
            }
        })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "workspace")?;
        Ok(Self {
            name: require_str(obj, "workspace", "name")?,
            isolated: obj
                .get("isolated")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape() {
        let payload = Workspace::new("demo").isolated().post_payload();
        assert_eq!(payload["workspace"]["name"], "demo");
        assert_eq!(payload["workspace"]["isolated"], true);
    }

    #[test]
    fn parse_response_with_extra_fields() {
        let doc = serde_json::json!({
            "workspace": {
                "name": "demo",
                "isolated": false,
                "dataStores": "http://localhost/rest/workspaces/demo/datastores.json"
            }
        });
        let ws = Workspace::from_get_response(&doc).unwrap();
        assert_eq!(ws.name, "demo");
        assert!(!ws.isolated);
    }

    #[test]
    fn parse_rejects_wrong_root() {
        let doc = serde_json::json!({"layer": {"name": "x"}});
        assert!(Workspace::from_get_response(&doc).is_err());
    }

    #[test]
    fn roundtrip() {
        let ws = Workspace::new("demo").isolated();
        let back = Workspace::from_get_response(&ws.post_payload()).unwrap();
        assert_eq!(back, ws);
    }
}
