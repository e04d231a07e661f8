//! REST catalog routes.
//!
//! Mirrors the admin API surface the client speaks: wrapped single-key JSON
//! documents, collection listings, 404/409 semantics and recursive deletes.

use crate::catalog::{Catalog, CatalogError, StoreKind};
use crate::{
    percent_decode, query_flag, read_body, respond_catalog_err, respond_empty, respond_err,
    respond_json, respond_raw,
};
use serde_json::{json, Value};
use tiny_http::Method;

fn wrap(key: &str, doc: Value) -> Value {
    json!({ key: doc })
}

fn wrap_list(collection: &str, member: &str, docs: Vec<Value>) -> Value {
    json!({ collection: { member: docs } })
}

fn parse_doc(body: &[u8], key: &str) -> Option<Value> {
    let parsed: Value = serde_json::from_slice(body).ok()?;
    let doc = parsed.get(key)?;
    doc.is_object().then(|| doc.clone())
}

fn doc_name(doc: &Value) -> Option<String> {
    doc.get("name").and_then(Value::as_str).map(str::to_owned)
}

/// `{ws}:{name}` → (ws, name).
fn split_qualified(qualified: &str) -> Option<(&str, &str)> {
    qualified.split_once(':')
}

pub fn handle_rest(catalog: &Catalog, mut req: tiny_http::Request, path: &str, query: &str) {
    let method = req.method().clone();
    let recurse = query_flag(query, "recurse");

    let trimmed = path.strip_prefix("/rest/").unwrap_or("");
    let had_json = trimmed.ends_with(".json");
    let trimmed = trimmed.strip_suffix(".json").unwrap_or(trimmed);
    let segments: Vec<String> = trimmed
        .split('/')
        .filter(|s| !s.is_empty())
        .map(percent_decode)
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    match segments.as_slice() {
        ["workspaces"] => match method {
            Method::Get => respond_json(
                req,
                wrap_list("workspaces", "workspace", catalog.list_workspaces()),
            ),
            Method::Post => {
                let Some(body) = read_body(&mut req) else {
                    respond_err(req, 500, "read error");
                    return;
                };
                let Some(doc) = parse_doc(&body, "workspace") else {
                    respond_err(req, 400, "malformed workspace document");
                    return;
                };
                let Some(name) = doc_name(&doc) else {
                    respond_err(req, 400, "workspace document has no name");
                    return;
                };
                match catalog.create_workspace(&name, doc) {
                    Ok(()) => respond_empty(req, 201),
                    Err(e) => respond_catalog_err(req, e),
                }
            }
            _ => respond_err(req, 405, "method not allowed"),
        },
        ["workspaces", ws] => match method {
            Method::Get => match catalog.get_workspace(ws) {
                Ok(doc) => respond_json(req, wrap("workspace", doc)),
                Err(e) => respond_catalog_err(req, e),
            },
            Method::Put => {
                let Some(body) = read_body(&mut req) else {
                    respond_err(req, 500, "read error");
                    return;
                };
                let Some(doc) = parse_doc(&body, "workspace") else {
                    respond_err(req, 400, "malformed workspace document");
                    return;
                };
                match catalog.update_workspace(ws, doc) {
                    Ok(()) => respond_empty(req, 200),
                    Err(e) => respond_catalog_err(req, e),
                }
            }
            Method::Delete => match catalog.delete_workspace(ws, recurse) {
                Ok(()) => respond_empty(req, 200),
                Err(e) => respond_catalog_err(req, e),
            },
            _ => respond_err(req, 405, "method not allowed"),
        },
        ["workspaces", ws, "styles"] => handle_styles(catalog, req, &method, Some(ws), None, true),
        ["workspaces", ws, "styles", name] => {
            handle_styles(catalog, req, &method, Some(ws), Some(name), had_json);
        }
        ["styles"] => handle_styles(catalog, req, &method, None, None, true),
        ["styles", name] => handle_styles(catalog, req, &method, None, Some(name), had_json),
        ["workspaces", ws, "layergroups"] => match method {
            Method::Get => match catalog.list_layergroups(ws) {
                Ok(docs) => respond_json(req, wrap_list("layerGroups", "layerGroup", docs)),
                Err(e) => respond_catalog_err(req, e),
            },
            Method::Post => {
                let Some(doc) = read_doc(&mut req, "layerGroup") else {
                    respond_err(req, 400, "malformed layer group document");
                    return;
                };
                let Some(name) = doc_name(&doc) else {
                    respond_err(req, 400, "layer group document has no name");
                    return;
                };
                match catalog.create_layergroup(ws, &name, doc) {
                    Ok(()) => respond_empty(req, 201),
                    Err(e) => respond_catalog_err(req, e),
                }
            }
            _ => respond_err(req, 405, "method not allowed"),
        },
        ["workspaces", ws, "layergroups", name] => match method {
            Method::Get => match catalog.get_layergroup(ws, name) {
                Ok(doc) => respond_json(req, wrap("layerGroup", doc)),
                Err(e) => respond_catalog_err(req, e),
            },
            Method::Put => {
                let Some(doc) = read_doc(&mut req, "layerGroup") else {
                    respond_err(req, 400, "malformed layer group document");
                    return;
                };
                match catalog.update_layergroup(ws, name, doc) {
                    Ok(()) => respond_empty(req, 200),
                    Err(e) => respond_catalog_err(req, e),
                }
            }
            Method::Delete => match catalog.delete_layergroup(ws, name) {
                Ok(()) => respond_empty(req, 200),
                Err(e) => respond_catalog_err(req, e),
            },
            _ => respond_err(req, 405, "method not allowed"),
        },
        ["workspaces", ws, store_seg] => {
            let Some(kind) = StoreKind::from_segment(store_seg) else {
                respond_err(req, 404, "not found");
                return;
            };
            match method {
                Method::Get => match catalog.list_stores(ws, kind) {
                    Ok(docs) => respond_json(
                        req,
                        wrap_list(kind.collection_key(), kind.store_key(), docs),
                    ),
                    Err(e) => respond_catalog_err(req, e),
                },
                Method::Post => {
                    let Some(doc) = read_doc(&mut req, kind.store_key()) else {
                        respond_err(req, 400, "malformed store document");
                        return;
                    };
                    let Some(name) = doc_name(&doc) else {
                        respond_err(req, 400, "store document has no name");
                        return;
                    };
                    match catalog.create_store(ws, kind, &name, doc) {
                        Ok(()) => respond_empty(req, 201),
                        Err(e) => respond_catalog_err(req, e),
                    }
                }
                _ => respond_err(req, 405, "method not allowed"),
            }
        }
        ["workspaces", ws, store_seg, store] => {
            let Some(kind) = StoreKind::from_segment(store_seg) else {
                respond_err(req, 404, "not found");
                return;
            };
            match method {
                Method::Get => match catalog.get_store(ws, kind, store) {
                    Ok(doc) => respond_json(req, wrap(kind.store_key(), doc)),
                    Err(e) => respond_catalog_err(req, e),
                },
                Method::Put => {
                    let Some(doc) = read_doc(&mut req, kind.store_key()) else {
                        respond_err(req, 400, "malformed store document");
                        return;
                    };
                    match catalog.update_store(ws, kind, store, doc) {
                        Ok(()) => respond_empty(req, 200),
                        Err(e) => respond_catalog_err(req, e),
                    }
                }
                Method::Delete => match catalog.delete_store(ws, kind, store, recurse) {
                    Ok(()) => respond_empty(req, 200),
                    Err(e) => respond_catalog_err(req, e),
                },
                _ => respond_err(req, 405, "method not allowed"),
            }
        }
        ["workspaces", ws, store_seg, store, res_seg] => {
            let Some(kind) = store_kind_for_resources(store_seg, res_seg) else {
                respond_err(req, 404, "not found");
                return;
            };
            match method {
                Method::Get => match catalog.list_resources(ws, kind, store) {
                    Ok(docs) => respond_json(
                        req,
                        wrap_list(kind.resource_collection_key(), kind.resource_key(), docs),
                    ),
                    Err(e) => respond_catalog_err(req, e),
                },
                Method::Post => {
                    let Some(doc) = read_doc(&mut req, kind.resource_key()) else {
                        respond_err(req, 400, "malformed resource document");
                        return;
                    };
                    let Some(name) = doc_name(&doc) else {
                        respond_err(req, 400, "resource document has no name");
                        return;
                    };
                    match catalog.create_resource(ws, kind, store, &name, doc) {
                        Ok(()) => respond_empty(req, 201),
                        Err(e) => respond_catalog_err(req, e),
                    }
                }
                _ => respond_err(req, 405, "method not allowed"),
            }
        }
        ["workspaces", ws, store_seg, store, res_seg, name] => {
            let Some(kind) = store_kind_for_resources(store_seg, res_seg) else {
                respond_err(req, 404, "not found");
                return;
            };
            match method {
                Method::Get => match catalog.get_resource(ws, kind, store, name) {
                    Ok(doc) => respond_json(req, wrap(kind.resource_key(), doc)),
                    Err(e) => respond_catalog_err(req, e),
                },
                Method::Put => {
                    let Some(doc) = read_doc(&mut req, kind.resource_key()) else {
                        respond_err(req, 400, "malformed resource document");
                        return;
                    };
                    match catalog.update_resource(ws, kind, store, name, doc) {
                        Ok(()) => respond_empty(req, 200),
                        Err(e) => respond_catalog_err(req, e),
                    }
                }
                Method::Delete => match catalog.delete_resource(ws, kind, store, name) {
                    Ok(()) => respond_empty(req, 200),
                    Err(e) => respond_catalog_err(req, e),
                },
                _ => respond_err(req, 405, "method not allowed"),
            }
        }
        ["layers", qualified] => {
            let Some((ws, name)) = split_qualified(qualified) else {
                respond_err(req, 400, "layer path must be workspace:name");
                return;
            };
            match method {
                Method::Get => match catalog.get_layer(ws, name) {
                    Ok(doc) => respond_json(req, wrap("layer", doc)),
                    Err(e) => respond_catalog_err(req, e),
                },
                Method::Put => {
                    let Some(doc) = read_doc(&mut req, "layer") else {
                        respond_err(req, 400, "malformed layer document");
                        return;
                    };
                    match catalog.update_layer(ws, name, doc) {
                        Ok(()) => respond_empty(req, 200),
                        Err(e) => respond_catalog_err(req, e),
                    }
                }
                Method::Delete => match catalog.delete_layer(ws, name) {
                    Ok(()) => respond_empty(req, 200),
                    Err(e) => respond_catalog_err(req, e),
                },
                _ => respond_err(req, 405, "method not allowed"),
            }
        }
        ["services", service, "workspaces", ws, "settings"] => {
            let service = service.to_owned();
            match method {
                Method::Get => match catalog.get_settings(ws, &service) {
                    Ok(doc) => respond_json(req, wrap(&service, doc)),
                    Err(e) => respond_catalog_err(req, e),
                },
                Method::Put => {
                    let Some(doc) = read_doc(&mut req, &service) else {
                        respond_err(req, 400, "malformed settings document");
                        return;
                    };
                    match catalog.put_settings(ws, &service, doc) {
                        Ok(()) => respond_empty(req, 200),
                        Err(e) => respond_catalog_err(req, e),
                    }
                }
                Method::Delete => match catalog.delete_settings(ws, &service) {
                    Ok(()) => respond_empty(req, 200),
                    Err(e) => respond_catalog_err(req, e),
                },
                _ => respond_err(req, 405, "method not allowed"),
            }
        }
        _ => respond_err(req, 404, "not found"),
    }
}

/// Tile-cache REST routes (`/gwc/rest/...`).
pub fn handle_gwc_rest(catalog: &Catalog, mut req: tiny_http::Request, path: &str) {
    let method = req.method().clone();
    let trimmed = path.strip_prefix("/gwc/rest/").unwrap_or("");
    let trimmed = trimmed.strip_suffix(".json").unwrap_or(trimmed);

    if let Some(qualified) = trimmed.strip_prefix("layers/") {
        let qualified = percent_decode(qualified);
        let Some((ws, layer)) = split_qualified(&qualified) else {
            respond_err(req, 400, "cached layer path must be workspace:name");
            return;
        };
        if method != Method::Get {
            respond_err(req, 405, "method not allowed");
            return;
        }
        if catalog.has_layer(ws, layer) {
            respond_json(
                req,
                json!({"GeoServerLayer": {"name": qualified, "enabled": true}}),
            );
        } else {
            respond_err(req, 404, "not found");
        }
    } else if let Some(qualified) = trimmed.strip_prefix("seed/") {
        let qualified = percent_decode(qualified);
        let Some((ws, layer)) = split_qualified(&qualified) else {
            respond_err(req, 400, "seed path must be workspace:name");
            return;
        };
        if method != Method::Post {
            respond_err(req, 405, "method not allowed");
            return;
        }
        if !catalog.has_layer(ws, layer) {
            respond_err(req, 404, "not found");
            return;
        }
        let Some(body) = read_body(&mut req) else {
            respond_err(req, 500, "read error");
            return;
        };
        let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        let kind = request
            .get("seedRequest")
            .and_then(|r| r.get("type"))
            .and_then(Value::as_str)
            .unwrap_or("seed");
        if kind == "truncate" {
            if let Err(e) = catalog.truncate_tiles(ws, layer) {
                respond_catalog_err(req, e);
                return;
            }
        }
        respond_empty(req, 200);
    } else {
        respond_err(req, 404, "not found");
    }
}

/// Style metadata (`.json`) and style body (no extension) share the path stem.
fn handle_styles(
    catalog: &Catalog,
    mut req: tiny_http::Request,
    method: &Method,
    workspace: Option<&str>,
    name: Option<&str>,
    metadata: bool,
) {
    match (name, method) {
        (None, Method::Get) => match catalog.list_styles(workspace) {
            Ok(docs) => respond_json(req, wrap_list("styles", "style", docs)),
            Err(e) => respond_catalog_err(req, e),
        },
        (None, Method::Post) => {
            let Some(doc) = read_doc(&mut req, "style") else {
                respond_err(req, 400, "malformed style document");
                return;
            };
            let Some(style_name) = doc_name(&doc) else {
                respond_err(req, 400, "style document has no name");
                return;
            };
            match catalog.create_style(workspace, &style_name, doc) {
                Ok(()) => respond_empty(req, 201),
                Err(e) => respond_catalog_err(req, e),
            }
        }
        (Some(style_name), Method::Get) if metadata => match catalog.get_style(workspace, style_name)
        {
            Ok(doc) => respond_json(req, wrap("style", doc)),
            Err(e) => respond_catalog_err(req, e),
        },
        (Some(style_name), Method::Get) => match catalog.get_style_body(workspace, style_name) {
            Ok((content_type, body)) => respond_raw(req, 200, &content_type, body),
            Err(e) => respond_catalog_err(req, e),
        },
        (Some(style_name), Method::Put) if metadata => {
            let Some(doc) = read_doc(&mut req, "style") else {
                respond_err(req, 400, "malformed style document");
                return;
            };
            match catalog.update_style(workspace, style_name, doc) {
                Ok(()) => respond_empty(req, 200),
                Err(e) => respond_catalog_err(req, e),
            }
        }
        (Some(style_name), Method::Put) => {
            let content_type = req
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_owned())
                .unwrap_or_else(|| "application/octet-stream".to_owned());
            let Some(body) = read_body(&mut req) else {
                respond_err(req, 500, "read error");
                return;
            };
            match catalog.put_style_body(workspace, style_name, &content_type, body) {
                Ok(()) => respond_empty(req, 200),
                Err(e) => respond_catalog_err(req, e),
            }
        }
        (Some(style_name), Method::Delete) => match catalog.delete_style(workspace, style_name) {
            Ok(()) => respond_empty(req, 200),
            Err(e) => respond_catalog_err(req, e),
        },
        _ => respond_err(req, 405, "method not allowed"),
    }
}

fn read_doc(req: &mut tiny_http::Request, key: &str) -> Option<Value> {
    let body = read_body(req)?;
    parse_doc(&body, key)
}

/// The resource segment must match the store kind it is nested under.
fn store_kind_for_resources(store_seg: &str, res_seg: &str) -> Option<StoreKind> {
    let kind = StoreKind::from_segment(store_seg)?;
    (kind.resource_segment() == res_seg).then_some(kind)
}
