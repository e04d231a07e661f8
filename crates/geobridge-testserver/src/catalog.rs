//! In-memory catalog: workspaces and everything scoped under them.
//!
//! Documents are stored as the inner JSON objects the client submits (the
//! wrapper key is stripped by the router and re-applied on the way out).
//! Names are unique within their owning scope.

use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

/// Outcome of a catalog operation that maps onto an HTTP status.
#[derive(Debug)]
pub enum CatalogError {
    /// Addressed resource (or a parent scope) does not exist.
    NotFound(String),
    /// Name already taken within the scope.
    Conflict(String),
    /// Non-recursive delete of a scope that still has children.
    NotEmpty(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// The four store kinds that share the store/resource CRUD shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Data,
    Coverage,
    CascadedWms,
    CascadedWmts,
}

impl StoreKind {
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "datastores" => Some(Self::Data),
            "coveragestores" => Some(Self::Coverage),
            "wmsstores" => Some(Self::CascadedWms),
            "wmtsstores" => Some(Self::CascadedWmts),
            _ => None,
        }
    }

    pub fn store_key(self) -> &'static str {
        match self {
            Self::Data => "dataStore",
            Self::Coverage => "coverageStore",
            Self::CascadedWms => "wmsStore",
            Self::CascadedWmts => "wmtsStore",
        }
    }

    pub fn collection_key(self) -> &'static str {
        match self {
            Self::Data => "dataStores",
            Self::Coverage => "coverageStores",
            Self::CascadedWms => "wmsStores",
            Self::CascadedWmts => "wmtsStores",
        }
    }

    /// Path segment of the resources published from this store kind.
    pub fn resource_segment(self) -> &'static str {
        match self {
            Self::Data => "featuretypes",
            Self::Coverage => "coverages",
            Self::CascadedWms => "wmslayers",
            Self::CascadedWmts => "layers",
        }
    }

    pub fn resource_key(self) -> &'static str {
        match self {
            Self::Data => "featureType",
            Self::Coverage => "coverage",
            Self::CascadedWms => "wmsLayer",
            Self::CascadedWmts => "wmtsLayer",
        }
    }

    pub fn resource_collection_key(self) -> &'static str {
        match self {
            Self::Data => "featureTypes",
            Self::Coverage => "coverages",
            Self::CascadedWms => "wmsLayers",
            Self::CascadedWmts => "wmtsLayers",
        }
    }
}

#[derive(Debug, Default, Clone)]
struct StoreEntry {
    doc: Value,
    resources: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Clone)]
struct StyleEntry {
    doc: Value,
    body: Option<(String, Vec<u8>)>,
}

#[derive(Debug, Default)]
struct WorkspaceEntry {
    doc: Value,
    stores: [BTreeMap<String, StoreEntry>; 4],
    styles: BTreeMap<String, StyleEntry>,
    layergroups: BTreeMap<String, Value>,
    layers: BTreeMap<String, Value>,
    wms_settings: Option<Value>,
    wfs_settings: Option<Value>,
    /// GeoJSON features keyed by feature type name.
    features: BTreeMap<String, Vec<Value>>,
    cached_tiles: HashSet<String>,
}

impl WorkspaceEntry {
    fn stores(&self, kind: StoreKind) -> &BTreeMap<String, StoreEntry> {
        &self.stores[kind as usize]
    }

    fn stores_mut(&mut self, kind: StoreKind) -> &mut BTreeMap<String, StoreEntry> {
        &mut self.stores[kind as usize]
    }

    fn is_empty(&self) -> bool {
        self.stores.iter().all(BTreeMap::is_empty)
            && self.styles.is_empty()
            && self.layergroups.is_empty()
            && self.layers.is_empty()
    }
}

#[derive(Default)]
struct State {
    workspaces: BTreeMap<String, WorkspaceEntry>,
    global_styles: BTreeMap<String, StyleEntry>,
}

/// The whole server state behind one lock. Requests are handled one at a
/// time, so contention is not a concern.
#[derive(Default)]
pub struct Catalog {
    state: RwLock<State>,
}

fn missing(what: &str, name: &str) -> CatalogError {
    CatalogError::NotFound(format!("{what} '{name}' not found"))
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // Workspaces

    pub fn create_workspace(&self, name: &str, doc: Value) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        if state.workspaces.contains_key(name) {
            return Err(CatalogError::Conflict(format!(
                "workspace '{name}' already exists"
            )));
        }
        state.workspaces.insert(
            name.to_owned(),
            WorkspaceEntry {
                doc,
                ..WorkspaceEntry::default()
            },
        );
        Ok(())
    }

    pub fn update_workspace(&self, name: &str, doc: Value) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(name)
            .ok_or_else(|| missing("workspace", name))?;
        ws.doc = doc;
        Ok(())
    }

    pub fn get_workspace(&self, name: &str) -> CatalogResult<Value> {
        let state = self.state.read().expect("catalog lock poisoned");
        state
            .workspaces
            .get(name)
            .map(|ws| ws.doc.clone())
            .ok_or_else(|| missing("workspace", name))
    }

    pub fn list_workspaces(&self) -> Vec<Value> {
        let state = self.state.read().expect("catalog lock poisoned");
        state.workspaces.values().map(|ws| ws.doc.clone()).collect()
    }

    pub fn delete_workspace(&self, name: &str, recurse: bool) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(name)
            .ok_or_else(|| missing("workspace", name))?;
        if !recurse && !ws.is_empty() {
            return Err(CatalogError::NotEmpty(format!(
                "workspace '{name}' is not empty"
            )));
        }
        state.workspaces.remove(name);
        Ok(())
    }

    // Stores

    pub fn create_store(
        &self,
        workspace: &str,
        kind: StoreKind,
        name: &str,
        doc: Value,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let stores = ws.stores_mut(kind);
        if stores.contains_key(name) {
            return Err(CatalogError::Conflict(format!(
                "{} '{name}' already exists in '{workspace}'",
                kind.store_key()
            )));
        }
        stores.insert(
            name.to_owned(),
            StoreEntry {
                doc,
                resources: BTreeMap::new(),
            },
        );
        Ok(())
    }

    pub fn update_store(
        &self,
        workspace: &str,
        kind: StoreKind,
        name: &str,
        doc: Value,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let store = ws
            .stores_mut(kind)
            .get_mut(name)
            .ok_or_else(|| missing(kind.store_key(), name))?;
        store.doc = doc;
        Ok(())
    }

    pub fn get_store(&self, workspace: &str, kind: StoreKind, name: &str) -> CatalogResult<Value> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        ws.stores(kind)
            .get(name)
            .map(|store| store.doc.clone())
            .ok_or_else(|| missing(kind.store_key(), name))
    }

    pub fn list_stores(&self, workspace: &str, kind: StoreKind) -> CatalogResult<Vec<Value>> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        Ok(ws.stores(kind).values().map(|s| s.doc.clone()).collect())
    }

    /// Deleting a store also drops its published layers (and their features)
    /// when `recurse` is set.
    pub fn delete_store(
        &self,
        workspace: &str,
        kind: StoreKind,
        name: &str,
        recurse: bool,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let store = ws
            .stores(kind)
            .get(name)
            .ok_or_else(|| missing(kind.store_key(), name))?;
        if !recurse && !store.resources.is_empty() {
            return Err(CatalogError::NotEmpty(format!(
                "{} '{name}' still has published resources",
                kind.store_key()
            )));
        }
        let resource_names: Vec<String> = store.resources.keys().cloned().collect();
        ws.stores_mut(kind).remove(name);
        for resource in resource_names {
            ws.layers.remove(&resource);
            ws.features.remove(&resource);
        }
        Ok(())
    }

    // Published resources (feature types, coverages, cascaded layers)

    pub fn create_resource(
        &self,
        workspace: &str,
        kind: StoreKind,
        store: &str,
        name: &str,
        doc: Value,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let entry = ws
            .stores_mut(kind)
            .get_mut(store)
            .ok_or_else(|| missing(kind.store_key(), store))?;
        if entry.resources.contains_key(name) {
            return Err(CatalogError::Conflict(format!(
                "{} '{name}' already exists in '{store}'",
                kind.resource_key()
            )));
        }
        entry.resources.insert(name.to_owned(), doc);

        // Publishing a resource implicitly creates its layer record.
        ws.layers.entry(name.to_owned()).or_insert_with(|| {
            serde_json::json!({
                "name": name,
                "type": if kind == StoreKind::Coverage { "RASTER" } else { "VECTOR" },
                "defaultStyle": {"name": "generic"},
            })
        });
        if kind == StoreKind::Data {
            ws.features.entry(name.to_owned()).or_default();
        }
        Ok(())
    }

    pub fn update_resource(
        &self,
        workspace: &str,
        kind: StoreKind,
        store: &str,
        name: &str,
        doc: Value,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let entry = ws
            .stores_mut(kind)
            .get_mut(store)
            .ok_or_else(|| missing(kind.store_key(), store))?;
        let slot = entry
            .resources
            .get_mut(name)
            .ok_or_else(|| missing(kind.resource_key(), name))?;
        *slot = doc;
        Ok(())
    }

    pub fn get_resource(
        &self,
        workspace: &str,
        kind: StoreKind,
        store: &str,
        name: &str,
    ) -> CatalogResult<Value> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let entry = ws
            .stores(kind)
            .get(store)
            .ok_or_else(|| missing(kind.store_key(), store))?;
        entry
            .resources
            .get(name)
            .cloned()
            .ok_or_else(|| missing(kind.resource_key(), name))
    }

    pub fn list_resources(
        &self,
        workspace: &str,
        kind: StoreKind,
        store: &str,
    ) -> CatalogResult<Vec<Value>> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let entry = ws
            .stores(kind)
            .get(store)
            .ok_or_else(|| missing(kind.store_key(), store))?;
        Ok(entry.resources.values().cloned().collect())
    }

    pub fn delete_resource(
        &self,
        workspace: &str,
        kind: StoreKind,
        store: &str,
        name: &str,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let entry = ws
            .stores_mut(kind)
            .get_mut(store)
            .ok_or_else(|| missing(kind.store_key(), store))?;
        if entry.resources.remove(name).is_none() {
            return Err(missing(kind.resource_key(), name));
        }
        ws.layers.remove(name);
        ws.features.remove(name);
        Ok(())
    }

    /// All published resource documents of a workspace, for capability
    /// rendering (feature types first, then coverages).
    pub fn published_resources(&self, workspace: &str) -> CatalogResult<Vec<Value>> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let mut docs = Vec::new();
        for kind in [StoreKind::Data, StoreKind::Coverage] {
            for store in ws.stores(kind).values() {
                docs.extend(store.resources.values().cloned());
            }
        }
        Ok(docs)
    }

    // Styles

    pub fn create_style(
        &self,
        workspace: Option<&str>,
        name: &str,
        doc: Value,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let styles = match workspace {
            Some(ws) => {
                &mut state
                    .workspaces
                    .get_mut(ws)
                    .ok_or_else(|| missing("workspace", ws))?
                    .styles
            }
            None => &mut state.global_styles,
        };
        if styles.contains_key(name) {
            return Err(CatalogError::Conflict(format!(
                "style '{name}' already exists"
            )));
        }
        styles.insert(name.to_owned(), StyleEntry { doc, body: None });
        Ok(())
    }

    pub fn update_style(
        &self,
        workspace: Option<&str>,
        name: &str,
        doc: Value,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let styles = match workspace {
            Some(ws) => {
                &mut state
                    .workspaces
                    .get_mut(ws)
                    .ok_or_else(|| missing("workspace", ws))?
                    .styles
            }
            None => &mut state.global_styles,
        };
        let style = styles.get_mut(name).ok_or_else(|| missing("style", name))?;
        style.doc = doc;
        Ok(())
    }

    pub fn get_style(&self, workspace: Option<&str>, name: &str) -> CatalogResult<Value> {
        let state = self.state.read().expect("catalog lock poisoned");
        let styles = match workspace {
            Some(ws) => {
                &state
                    .workspaces
                    .get(ws)
                    .ok_or_else(|| missing("workspace", ws))?
                    .styles
            }
            None => &state.global_styles,
        };
        styles
            .get(name)
            .map(|s| s.doc.clone())
            .ok_or_else(|| missing("style", name))
    }

    pub fn list_styles(&self, workspace: Option<&str>) -> CatalogResult<Vec<Value>> {
        let state = self.state.read().expect("catalog lock poisoned");
        let styles = match workspace {
            Some(ws) => {
                &state
                    .workspaces
                    .get(ws)
                    .ok_or_else(|| missing("workspace", ws))?
                    .styles
            }
            None => &state.global_styles,
        };
        Ok(styles.values().map(|s| s.doc.clone()).collect())
    }

    pub fn delete_style(&self, workspace: Option<&str>, name: &str) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let styles = match workspace {
            Some(ws) => {
                &mut state
                    .workspaces
                    .get_mut(ws)
                    .ok_or_else(|| missing("workspace", ws))?
                    .styles
            }
            None => &mut state.global_styles,
        };
        styles
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| missing("style", name))
    }

    pub fn put_style_body(
        &self,
        workspace: Option<&str>,
        name: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let styles = match workspace {
            Some(ws) => {
                &mut state
                    .workspaces
                    .get_mut(ws)
                    .ok_or_else(|| missing("workspace", ws))?
                    .styles
            }
            None => &mut state.global_styles,
        };
        let style = styles.get_mut(name).ok_or_else(|| missing("style", name))?;
        style.body = Some((content_type.to_owned(), body));
        Ok(())
    }

    pub fn get_style_body(
        &self,
        workspace: Option<&str>,
        name: &str,
    ) -> CatalogResult<(String, Vec<u8>)> {
        let state = self.state.read().expect("catalog lock poisoned");
        let styles = match workspace {
            Some(ws) => {
                &state
                    .workspaces
                    .get(ws)
                    .ok_or_else(|| missing("workspace", ws))?
                    .styles
            }
            None => &state.global_styles,
        };
        styles
            .get(name)
            .and_then(|s| s.body.clone())
            .ok_or_else(|| missing("style body", name))
    }

    // Layer groups

    pub fn create_layergroup(&self, workspace: &str, name: &str, doc: Value) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        if ws.layergroups.contains_key(name) {
            return Err(CatalogError::Conflict(format!(
                "layer group '{name}' already exists"
            )));
        }
        ws.layergroups.insert(name.to_owned(), doc);
        Ok(())
    }

    pub fn update_layergroup(&self, workspace: &str, name: &str, doc: Value) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let slot = ws
            .layergroups
            .get_mut(name)
            .ok_or_else(|| missing("layer group", name))?;
        *slot = doc;
        Ok(())
    }

    pub fn get_layergroup(&self, workspace: &str, name: &str) -> CatalogResult<Value> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        ws.layergroups
            .get(name)
            .cloned()
            .ok_or_else(|| missing("layer group", name))
    }

    pub fn list_layergroups(&self, workspace: &str) -> CatalogResult<Vec<Value>> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        Ok(ws.layergroups.values().cloned().collect())
    }

    pub fn delete_layergroup(&self, workspace: &str, name: &str) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        ws.layergroups
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| missing("layer group", name))
    }

    // Layer publishing records

    pub fn get_layer(&self, workspace: &str, name: &str) -> CatalogResult<Value> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        ws.layers
            .get(name)
            .cloned()
            .ok_or_else(|| missing("layer", name))
    }

    /// Layers only accept PUT; the record must already exist (it is created
    /// when the resource is published).
    pub fn update_layer(&self, workspace: &str, name: &str, doc: Value) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let slot = ws
            .layers
            .get_mut(name)
            .ok_or_else(|| missing("layer", name))?;
        *slot = doc;
        Ok(())
    }

    pub fn delete_layer(&self, workspace: &str, name: &str) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        ws.layers
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| missing("layer", name))
    }

    pub fn has_layer(&self, workspace: &str, name: &str) -> bool {
        let state = self.state.read().expect("catalog lock poisoned");
        state
            .workspaces
            .get(workspace)
            .is_some_and(|ws| ws.layers.contains_key(name))
    }

    // Service settings

    pub fn put_settings(&self, workspace: &str, service: &str, doc: Value) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        match service {
            "wms" => ws.wms_settings = Some(doc),
            "wfs" => ws.wfs_settings = Some(doc),
            _ => return Err(missing("service", service)),
        }
        Ok(())
    }

    pub fn get_settings(&self, workspace: &str, service: &str) -> CatalogResult<Value> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let settings = match service {
            "wms" => &ws.wms_settings,
            "wfs" => &ws.wfs_settings,
            _ => &None,
        };
        settings
            .clone()
            .ok_or_else(|| missing("settings", workspace))
    }

    pub fn delete_settings(&self, workspace: &str, service: &str) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let settings = match service {
            "wms" => &mut ws.wms_settings,
            "wfs" => &mut ws.wfs_settings,
            _ => return Err(missing("service", service)),
        };
        settings
            .take()
            .map(|_| ())
            .ok_or_else(|| missing("settings", workspace))
    }

    // Features (WFS)

    pub fn list_features(&self, workspace: &str, type_name: &str) -> CatalogResult<Vec<Value>> {
        let state = self.state.read().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        ws.features
            .get(type_name)
            .cloned()
            .ok_or_else(|| missing("feature type", type_name))
    }

    pub fn insert_feature(
        &self,
        workspace: &str,
        type_name: &str,
        feature: Value,
    ) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let features = ws
            .features
            .get_mut(type_name)
            .ok_or_else(|| missing("feature type", type_name))?;
        features.push(feature);
        Ok(())
    }

    /// Remove features whose property equals the literal; returns the count.
    pub fn delete_features(
        &self,
        workspace: &str,
        type_name: &str,
        property: &str,
        literal: &str,
    ) -> CatalogResult<usize> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let features = ws
            .features
            .get_mut(type_name)
            .ok_or_else(|| missing("feature type", type_name))?;
        let before = features.len();
        features.retain(|f| {
            f.get("properties")
                .and_then(|p| p.get(property))
                .map(property_as_string)
                .as_deref()
                != Some(literal)
        });
        Ok(before - features.len())
    }

    // Tile cache

    /// Record a tile fetch; true when the tile was already cached.
    pub fn fetch_tile(&self, workspace: &str, tile_key: &str) -> CatalogResult<bool> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        Ok(!ws.cached_tiles.insert(tile_key.to_owned()))
    }

    /// Drop every cached tile belonging to one layer.
    pub fn truncate_tiles(&self, workspace: &str, layer: &str) -> CatalogResult<()> {
        let mut state = self.state.write().expect("catalog lock poisoned");
        let ws = state
            .workspaces
            .get_mut(workspace)
            .ok_or_else(|| missing("workspace", workspace))?;
        let prefix = format!("{layer}/");
        ws.cached_tiles.retain(|key| !key.starts_with(&prefix));
        Ok(())
    }

    pub fn get_wms_default_locale(&self, workspace: &str) -> Option<String> {
        let state = self.state.read().expect("catalog lock poisoned");
        state
            .workspaces
            .get(workspace)?
            .wms_settings
            .as_ref()?
            .get("defaultLocale")?
            .as_str()
            .map(str::to_owned)
    }
}

/// Feature properties may be numbers or strings; filters compare textually.
fn property_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog_with_workspace() -> Catalog {
        let catalog = Catalog::new();
        catalog
            .create_workspace("demo", json!({"name": "demo"}))
            .unwrap();
        catalog
    }

    #[test]
    fn duplicate_workspace_conflicts() {
        let catalog = catalog_with_workspace();
        let err = catalog
            .create_workspace("demo", json!({"name": "demo"}))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[test]
    fn store_requires_workspace() {
        let catalog = Catalog::new();
        let err = catalog
            .create_store("nope", StoreKind::Data, "pg", json!({"name": "pg"}))
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn publishing_a_feature_type_creates_the_layer() {
        let catalog = catalog_with_workspace();
        catalog
            .create_store("demo", StoreKind::Data, "pg", json!({"name": "pg"}))
            .unwrap();
        catalog
            .create_resource("demo", StoreKind::Data, "pg", "rivers", json!({"name": "rivers"}))
            .unwrap();
        assert!(catalog.has_layer("demo", "rivers"));
        assert_eq!(catalog.list_features("demo", "rivers").unwrap().len(), 0);
    }

    #[test]
    fn non_recursive_delete_of_populated_workspace_fails() {
        let catalog = catalog_with_workspace();
        catalog
            .create_store("demo", StoreKind::Data, "pg", json!({"name": "pg"}))
            .unwrap();
        let err = catalog.delete_workspace("demo", false).unwrap_err();
        assert!(matches!(err, CatalogError::NotEmpty(_)));
        catalog.delete_workspace("demo", true).unwrap();
        assert!(matches!(
            catalog.get_workspace("demo"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn feature_filter_matches_numbers_textually() {
        let catalog = catalog_with_workspace();
        catalog
            .create_store("demo", StoreKind::Data, "pg", json!({"name": "pg"}))
            .unwrap();
        catalog
            .create_resource("demo", StoreKind::Data, "pg", "rivers", json!({"name": "rivers"}))
            .unwrap();
        catalog
            .insert_feature("demo", "rivers", json!({"properties": {"id": 10}}))
            .unwrap();
        let removed = catalog.delete_features("demo", "rivers", "id", "10").unwrap();
        assert_eq!(removed, 1);
        assert!(catalog.list_features("demo", "rivers").unwrap().is_empty());
    }

    #[test]
    fn tile_cache_miss_then_hit() {
        let catalog = catalog_with_workspace();
        assert!(!catalog.fetch_tile("demo", "rivers/EPSG:4326:3/2/5").unwrap());
        assert!(catalog.fetch_tile("demo", "rivers/EPSG:4326:3/2/5").unwrap());
        catalog.truncate_tiles("demo", "rivers").unwrap();
        assert!(!catalog.fetch_tile("demo", "rivers/EPSG:4326:3/2/5").unwrap());
    }
}
