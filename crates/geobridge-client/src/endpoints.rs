//! REST and OGC path builders.
//!
//! Pure string templates mapping (workspace, kind, name) to server paths.
//! All REST paths address the JSON representation; style bodies and OGC
//! services have their own content types.

pub fn workspaces() -> String {
    "/rest/workspaces.json".to_owned()
}

pub fn workspace(name: &str) -> String {
    format!("/rest/workspaces/{name}.json")
}

pub fn datastores(workspace: &str) -> String {
    format!("/rest/workspaces/{workspace}/datastores.json")
}

pub fn datastore(workspace: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/datastores/{name}.json")
}

pub fn featuretypes(workspace: &str, datastore: &str) -> String {
    format!("/rest/workspaces/{workspace}/datastores/{datastore}/featuretypes.json")
}

pub fn featuretype(workspace: &str, datastore: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/datastores/{datastore}/featuretypes/{name}.json")
}

pub fn coveragestores(workspace: &str) -> String {
    format!("/rest/workspaces/{workspace}/coveragestores.json")
}

pub fn coveragestore(workspace: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/coveragestores/{name}.json")
}

pub fn coverages(workspace: &str, coveragestore: &str) -> String {
    format!("/rest/workspaces/{workspace}/coveragestores/{coveragestore}/coverages.json")
}

pub fn coverage(workspace: &str, coveragestore: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/coveragestores/{coveragestore}/coverages/{name}.json")
}

pub fn styles(workspace: Option<&str>) -> String {
    match workspace {
        Some(ws) => format!("/rest/workspaces/{ws}/styles.json"),
        None => "/rest/styles.json".to_owned(),
    }
}

pub fn style(workspace: Option<&str>, name: &str) -> String {
    match workspace {
        Some(ws) => format!("/rest/workspaces/{ws}/styles/{name}.json"),
        None => format!("/rest/styles/{name}.json"),
    }
}

/// The style definition body (SLD/ZIP/MBStyle), as opposed to its metadata.
pub fn style_body(workspace: Option<&str>, name: &str) -> String {
    match workspace {
        Some(ws) => format!("/rest/workspaces/{ws}/styles/{name}"),
        None => format!("/rest/styles/{name}"),
    }
}

pub fn layer(workspace: &str, name: &str) -> String {
    format!("/rest/layers/{workspace}:{name}.json")
}

pub fn layergroups(workspace: &str) -> String {
    format!("/rest/workspaces/{workspace}/layergroups.json")
}

pub fn layergroup(workspace: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/layergroups/{name}.json")
}

pub fn wmsstores(workspace: &str) -> String {
    format!("/rest/workspaces/{workspace}/wmsstores.json")
}

pub fn wmsstore(workspace: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/wmsstores/{name}.json")
}

pub fn wmslayers(workspace: &str, wmsstore: &str) -> String {
    format!("/rest/workspaces/{workspace}/wmsstores/{wmsstore}/wmslayers.json")
}

pub fn wmslayer(workspace: &str, wmsstore: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/wmsstores/{wmsstore}/wmslayers/{name}.json")
}

pub fn wmtsstores(workspace: &str) -> String {
    format!("/rest/workspaces/{workspace}/wmtsstores.json")
}

pub fn wmtsstore(workspace: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/wmtsstores/{name}.json")
}

pub fn wmtslayers(workspace: &str, wmtsstore: &str) -> String {
    format!("/rest/workspaces/{workspace}/wmtsstores/{wmtsstore}/layers.json")
}

pub fn wmtslayer(workspace: &str, wmtsstore: &str, name: &str) -> String {
    format!("/rest/workspaces/{workspace}/wmtsstores/{wmtsstore}/layers/{name}.json")
}

pub fn wms_settings(workspace: &str) -> String {
    format!("/rest/services/wms/workspaces/{workspace}/settings.json")
}

pub fn wfs_settings(workspace: &str) -> String {
    format!("/rest/services/wfs/workspaces/{workspace}/settings.json")
}

/// Tile-cache layer record under the caching subsystem's REST API.
pub fn gwc_layer(workspace: &str, layer: &str) -> String {
    format!("/gwc/rest/layers/{workspace}:{layer}.json")
}

/// Tile-cache seed/truncate endpoint for a cached layer.
pub fn gwc_seed(workspace: &str, layer: &str) -> String {
    format!("/gwc/rest/seed/{workspace}:{layer}.json")
}

/// Workspace-scoped WMS service endpoint.
pub fn wms_service(workspace: &str) -> String {
    format!("/{workspace}/wms")
}

/// Workspace-scoped OWS endpoint (WFS requests go here).
pub fn ows_service(workspace: &str) -> String {
    format!("/{workspace}/ows")
}

/// KVP binding of the tile service.
pub fn wmts_service() -> String {
    "/gwc/service/wmts".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_paths() {
        assert_eq!(workspace("demo"), "/rest/workspaces/demo.json");
        assert_eq!(
            featuretype("demo", "pg", "rivers"),
            "/rest/workspaces/demo/datastores/pg/featuretypes/rivers.json"
        );
        assert_eq!(layer("demo", "rivers"), "/rest/layers/demo:rivers.json");
        assert_eq!(
            gwc_layer("demo", "rivers"),
            "/gwc/rest/layers/demo:rivers.json"
        );
    }

    #[test]
    fn style_paths_with_and_without_workspace() {
        assert_eq!(style(None, "roads"), "/rest/styles/roads.json");
        assert_eq!(
            style(Some("demo"), "roads"),
            "/rest/workspaces/demo/styles/roads.json"
        );
        assert_eq!(style_body(Some("demo"), "roads"), "/rest/workspaces/demo/styles/roads");
    }

    #[test]
    fn service_paths() {
        assert_eq!(wms_service("demo"), "/demo/wms");
        assert_eq!(ows_service("demo"), "/demo/ows");
        assert_eq!(wmts_service(), "/gwc/service/wmts");
    }
}
