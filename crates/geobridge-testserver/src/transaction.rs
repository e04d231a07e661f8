//! WFS-T request body parsing.
//!
//! Handles the subset the operations facade emits: Insert with one point
//! geometry plus scalar properties, and Delete with a single
//! PropertyIsEqualTo filter. Namespace prefixes are ignored; elements are
//! matched by local name.

use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionOp {
    Insert {
        type_name: String,
        point: Option<(f64, f64)>,
        properties: Vec<(String, String)>,
    },
    Delete {
        type_name: String,
        property: String,
        literal: String,
    },
}

fn local_name(qualified: &[u8]) -> String {
    let name = String::from_utf8_lossy(qualified);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_owned(),
        None => name.into_owned(),
    }
}

#[derive(Default)]
struct InsertBuilder {
    depth: usize,
    type_name: Option<String>,
    type_depth: usize,
    point: Option<(f64, f64)>,
    pending_pos: Option<(f64, f64)>,
    properties: Vec<(String, String)>,
}

#[derive(Default)]
struct DeleteBuilder {
    type_name: String,
    property: String,
    literal: String,
}

pub fn parse_transaction(xml: &str) -> Result<Vec<TransactionOp>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut ops = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut insert: Option<InsertBuilder> = None;
    let mut delete: Option<DeleteBuilder> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                let local = local_name(start.name().as_ref());
                stack.push(local.clone());
                text.clear();
                match local.as_str() {
                    "Insert" => {
                        insert = Some(InsertBuilder {
                            depth: stack.len(),
                            ..InsertBuilder::default()
                        });
                    }
                    "Delete" => {
                        let mut builder = DeleteBuilder::default();
                        for attr in start.attributes().flatten() {
                            if attr.key.as_ref() == b"typeName" {
                                let value =
                                    attr.unescape_value().map_err(|e| e.to_string())?;
                                builder.type_name = match value.rsplit_once(':') {
                                    Some((_, local)) => local.to_owned(),
                                    None => value.into_owned(),
                                };
                            }
                        }
                        delete = Some(builder);
                    }
                    _ => {
                        if let Some(builder) = insert.as_mut() {
                            if builder.type_name.is_none() && stack.len() == builder.depth + 1 {
                                builder.type_name = Some(local);
                                builder.type_depth = stack.len();
                            }
                        }
                    }
                }
            }
            Ok(Event::Text(content)) => {
                text = content
                    .unescape()
                    .map_err(|e| e.to_string())?
                    .into_owned();
            }
            Ok(Event::End(_)) => {
                let Some(local) = stack.last().cloned() else {
                    return Err("unbalanced end tag".to_owned());
                };
                match local.as_str() {
                    "pos" => {
                        if let Some(builder) = insert.as_mut() {
                            builder.pending_pos = parse_pos(&text);
                        }
                    }
                    "ValueReference" => {
                        if let Some(builder) = delete.as_mut() {
                            builder.property = text.clone();
                        }
                    }
                    "Literal" => {
                        if let Some(builder) = delete.as_mut() {
                            builder.literal = text.clone();
                        }
                    }
                    "Insert" => {
                        let builder = insert.take().ok_or("stray Insert end tag")?;
                        ops.push(TransactionOp::Insert {
                            type_name: builder
                                .type_name
                                .ok_or("Insert without a feature element")?,
                            point: builder.point,
                            properties: builder.properties,
                        });
                    }
                    "Delete" => {
                        let builder = delete.take().ok_or("stray Delete end tag")?;
                        ops.push(TransactionOp::Delete {
                            type_name: builder.type_name,
                            property: builder.property,
                            literal: builder.literal,
                        });
                    }
                    _ => {
                        // A direct child of the feature element is either the
                        // geometry field (a pos was seen inside) or a scalar
                        // property.
                        if let Some(builder) = insert.as_mut() {
                            if builder.type_name.is_some() && stack.len() == builder.type_depth + 1
                            {
                                match builder.pending_pos.take() {
                                    Some(pos) => builder.point = Some(pos),
                                    None => builder.properties.push((local, text.clone())),
                                }
                            }
                        }
                    }
                }
                stack.pop();
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err("unclosed element".to_owned());
    }
    Ok(ops)
}

/// `<gml:pos>` content is "x y".
fn parse_pos(text: &str) -> Option<(f64, f64)> {
    let mut parts = text.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}
