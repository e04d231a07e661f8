//! Internationalized text fields.
//!
//! The server encodes a title (or abstract) either as a plain string under one
//! key (`"title"`) or as a locale→value map under a sibling key
//! (`"internationalTitle"`). The two are mutually exclusive on the wire; which
//! one a resource uses is decided at construction time by the input type and
//! reproduced as-is when parsing a response back.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl I18nText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn localized<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Localized(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Resolve the text for a language: an exact locale match for localized
    /// values, the plain text otherwise (language-independent).
    pub fn get(&self, language: Option<&str>) -> Option<&str> {
        match self {
            Self::Plain(s) => Some(s),
            Self::Localized(map) => language.and_then(|lang| map.get(lang).map(String::as_str)),
        }
    }

    /// Insert this value into a wire document under the key matching its
    /// representation.
    pub fn write_into(&self, obj: &mut Map<String, Value>, plain_key: &str, localized_key: &str) {
        match self {
            Self::Plain(s) => {
                obj.insert(plain_key.to_owned(), Value::String(s.clone()));
            }
            Self::Localized(map) => {
                let entries: Map<String, Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect();
                obj.insert(localized_key.to_owned(), Value::Object(entries));
            }
        }
    }

    /// Read back whichever representation a response document carries.
    /// Returns `None` when neither key is present.
    pub fn read_from(obj: &Value, plain_key: &str, localized_key: &str) -> Option<Self> {
        if let Some(Value::String(s)) = obj.get(plain_key) {
            return Some(Self::Plain(s.clone()));
        }
        if let Some(Value::Object(map)) = obj.get(localized_key) {
            let entries = map
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_owned())))
                .collect();
            return Some(Self::Localized(entries));
        }
        None
    }
}

impl From<&str> for I18nText {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_owned())
    }
}

impl From<String> for I18nText {
    fn from(s: String) -> Self {
        Self::Plain(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_writes_plain_key() {
        let mut obj = Map::new();
        I18nText::plain("Rivers").write_into(&mut obj, "title", "internationalTitle");
        assert_eq!(obj.get("title"), Some(&json!("Rivers")));
        assert!(!obj.contains_key("internationalTitle"));
    }

    #[test]
    fn localized_writes_locale_map() {
        let mut obj = Map::new();
        I18nText::localized([("de", "Flüsse"), ("fr", "Rivières")]).write_into(
            &mut obj,
            "title",
            "internationalTitle",
        );
        assert!(!obj.contains_key("title"));
        assert_eq!(
            obj.get("internationalTitle"),
            Some(&json!({"de": "Flüsse", "fr": "Rivières"}))
        );
    }

    #[test]
    fn read_back_picks_matching_representation() {
        let plain = json!({"title": "Rivers"});
        assert_eq!(
            I18nText::read_from(&plain, "title", "internationalTitle"),
            Some(I18nText::plain("Rivers"))
        );

        let localized = json!({"internationalTitle": {"de": "Flüsse"}});
        assert_eq!(
            I18nText::read_from(&localized, "title", "internationalTitle"),
            Some(I18nText::localized([("de", "Flüsse")]))
        );

        let neither = json!({"name": "x"});
        assert_eq!(I18nText::read_from(&neither, "title", "internationalTitle"), None);
    }

    #[test]
    fn roundtrip_preserves_representation() {
        let mut obj = Map::new();
        let original = I18nText::localized([("de", "Flüsse"), ("rm", "Flums")]);
        original.write_into(&mut obj, "title", "internationalTitle");
        let back =
            I18nText::read_from(&Value::Object(obj), "title", "internationalTitle").unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn get_resolves_by_language() {
        let text = I18nText::localized([("de", "Flüsse")]);
        assert_eq!(text.get(Some("de")), Some("Flüsse"));
        assert_eq!(text.get(Some("fr")), None);
        assert_eq!(text.get(None), None);

        let plain = I18nText::plain("Rivers");
        assert_eq!(plain.get(Some("de")), Some("Rivers"));
        assert_eq!(plain.get(None), Some("Rivers"));
    }
}
