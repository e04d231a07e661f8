//! Vector data stores (PostGIS and friends).

use crate::entries::EntryList;
use crate::{name_ref, require_str, unwrap_root, ModelError};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStore {
    pub workspace: String,
    pub name: String,
    /// Store type tag as reported by the server, e.g. `PostGIS`.
    pub store_type: Option<String>,
    pub description: Option<String>,
    pub enabled: bool,
    /// Ordered connection parameters (host, port, database, ...).
    pub connection_parameters: EntryList,
}

impl DataStore {
    pub fn new(workspace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            name: name.into(),
            store_type: None,
            description: None,
            enabled: true,
            connection_parameters: EntryList::new(),
        }
    }

    /// A PostGIS-backed store with the canonical parameter set.
    #[allow(clippy::too_many_arguments)]
    pub fn postgis(
        workspace: impl Into<String>,
        name: impl Into<String>,
        host: &str,
        port: u16,
        database: &str,
        user: &str,
        password: &str,
        schema: &str,
    ) -> Self {
        let mut store = Self::new(workspace, name);
        store.store_type = Some("PostGIS".to_owned());
        store.connection_parameters = [
            ("dbtype", "postgis"),
            ("host", host),
            ("port", &port.to_string()),
            ("database", database),
            ("user", user),
            ("passwd", password),
            ("schema", schema),
            ("Expose primary keys", "true"),
        ]
        .into_iter()
        .collect();
        store
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn post_payload(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("name".to_owned(), json!(self.name));
        if let Some(store_type) = &self.store_type {
            obj.insert("type".to_owned(), json!(store_type));
        }
        if let Some(description) = &self.description {
            obj.insert("description".to_owned(), json!(description));
        }
        obj.insert("enabled".to_owned(), json!(self.enabled));
        obj.insert("workspace".to_owned(), json!({"name": self.workspace}));
        if !self.connection_parameters.is_empty() {
            obj.insert(
                "connectionParameters".to_owned(),
                self.connection_parameters.to_value(),
            );
        }
        json!({ "dataStore": obj })
    }

    pub fn put_payload(&self) -> Value {
        self.post_payload()
    }

    pub fn from_get_response(doc: &Value) -> Result<Self, ModelError> {
        let obj = unwrap_root(doc, "dataStore")?;
        Ok(Self {
            workspace: name_ref(obj, "workspace").unwrap_or_default(),
            name: require_str(obj, "dataStore", "name")?,
            store_type: obj.get("type").and_then(Value::as_str).map(str::to_owned),
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_owned),
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            connection_parameters: obj
                .get("connectionParameters")
                .map(EntryList::from_value)
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataStore {
        DataStore::postgis("demo", "pg", "db.local", 5432, "gis", "geo", "secret", "public")
    }

    #[test]
    fn postgis_payload_carries_ordered_parameters() {
        let payload = sample().post_payload();
        let store = &payload["dataStore"];
        assert_eq!(store["name"], "pg");
        assert_eq!(store["type"], "PostGIS");
        assert_eq!(store["workspace"]["name"], "demo");
        assert_eq!(store["connectionParameters"]["entry"][0]["@key"], "dbtype");
        assert_eq!(store["connectionParameters"]["entry"][1]["$"], "db.local");
    }

    #[test]
    fn optional_fields_omitted_when_unset() {
        let payload = DataStore::new("demo", "plain").post_payload();
        let store = payload["dataStore"].as_object().unwrap();
        assert!(!store.contains_key("type"));
        assert!(!store.contains_key("description"));
        assert!(!store.contains_key("connectionParameters"));
    }

    #[test]
    fn roundtrip_preserves_connection_parameters() {
        let store = sample().with_description("main database");
        let back = DataStore::from_get_response(&store.post_payload()).unwrap();
        assert_eq!(back, store);
        assert_eq!(back.connection_parameters.get("schema"), Some("public"));
    }

    #[test]
    fn parse_single_connection_parameter_object() {
        let doc = serde_json::json!({
            "dataStore": {
                "name": "one",
                "workspace": {"name": "demo"},
                "connectionParameters": {"entry": {"@key": "dbtype", "$": "postgis"}}
            }
        });
        let store = DataStore::from_get_response(&doc).unwrap();
        assert_eq!(store.connection_parameters.get("dbtype"), Some("postgis"));
    }
}
