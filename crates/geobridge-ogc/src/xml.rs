//! Generic XML → JSON-shaped value conversion.
//!
//! Element trees become nested objects: attributes are `@`-prefixed keys,
//! text content lands under `$`, and repeated sibling elements collapse into
//! arrays. An element with text only (no attributes, no children) becomes a
//! plain string. Namespace prefixes are kept as written.

use crate::OgcError;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

pub fn xml_to_value(xml: &str) -> Result<Value, OgcError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    // Stack of open elements: (name, partial object).
    let mut stack: Vec<(String, Map<String, Value>)> = Vec::new();
    let mut root = Map::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                let mut obj = Map::new();
                for attr in start.attributes().flatten() {
                    let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
                    let value = attr
                        .unescape_value()
                        .map_err(|e| OgcError::Xml(e.to_string()))?;
                    obj.insert(key, Value::String(value.into_owned()));
                }
                stack.push((name, obj));
            }
            Ok(Event::Empty(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                let mut obj = Map::new();
                for attr in start.attributes().flatten() {
                    let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
                    let value = attr
                        .unescape_value()
                        .map_err(|e| OgcError::Xml(e.to_string()))?;
                    obj.insert(key, Value::String(value.into_owned()));
                }
                let parent = stack.last_mut().map_or(&mut root, |(_, obj)| obj);
                insert_child(parent, name, collapse(obj));
            }
            Ok(Event::Text(text)) => {
                let content = text
                    .unescape()
                    .map_err(|e| OgcError::Xml(e.to_string()))?
                    .into_owned();
                if !content.is_empty() {
                    if let Some((_, obj)) = stack.last_mut() {
                        match obj.get_mut("$") {
                            Some(Value::String(existing)) => existing.push_str(&content),
                            _ => {
                                obj.insert("$".to_owned(), Value::String(content));
                            }
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                let Some((name, obj)) = stack.pop() else {
                    return Err(OgcError::Xml("unbalanced end tag".to_owned()));
                };
                let parent = stack.last_mut().map_or(&mut root, |(_, obj)| obj);
                insert_child(parent, name, collapse(obj));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(OgcError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(OgcError::Xml("unclosed element".to_owned()));
    }
    Ok(Value::Object(root))
}

/// Text-only elements collapse to plain strings, the xmltodict convention.
fn collapse(obj: Map<String, Value>) -> Value {
    if obj.len() == 1 {
        if let Some(Value::String(text)) = obj.get("$") {
            return Value::String(text.clone());
        }
    }
    Value::Object(obj)
}

/// Repeated sibling elements become arrays.
fn insert_child(parent: &mut Map<String, Value>, name: String, child: Value) {
    match parent.get_mut(&name) {
        None => {
            parent.insert(name, child);
        }
        Some(Value::Array(items)) => items.push(child),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, child]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_element_collapses_to_string() {
        let value = xml_to_value("<Name>rivers</Name>").unwrap();
        assert_eq!(value["Name"], "rivers");
    }

    #[test]
    fn attributes_are_at_prefixed() {
        let value = xml_to_value(r#"<Layer queryable="1"><Name>a</Name></Layer>"#).unwrap();
        assert_eq!(value["Layer"]["@queryable"], "1");
        assert_eq!(value["Layer"]["Name"], "a");
    }

    #[test]
    fn repeated_siblings_become_array() {
        let value =
            xml_to_value("<Layers><Layer>a</Layer><Layer>b</Layer><Layer>c</Layer></Layers>")
                .unwrap();
        assert_eq!(value["Layers"]["Layer"], serde_json::json!(["a", "b", "c"]));
    }

    #[test]
    fn mixed_attributes_and_text_keep_dollar_key() {
        let value = xml_to_value(r#"<crs class="projected">EPSG:2056</crs>"#).unwrap();
        assert_eq!(value["crs"]["@class"], "projected");
        assert_eq!(value["crs"]["$"], "EPSG:2056");
    }

    #[test]
    fn empty_element_becomes_object() {
        let value = xml_to_value(r#"<Online href="http://x"/>"#).unwrap();
        assert_eq!(value["Online"]["@href"], "http://x");
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(xml_to_value("<a><b></a>").is_err());
    }

    #[test]
    fn entity_unescaping() {
        let value = xml_to_value("<t>a &amp; b</t>").unwrap();
        assert_eq!(value["t"], "a & b");
    }
}
