//! REST catalog lifecycle tests against an in-process reference server.
//!
//! These start a real `geobridge-testserver` on a random port and exercise
//! the real client against it. No mocks.

use geobridge_client::{GeoClient, InstanceConfig, Outcome};
use geobridge_model::{
    Attribute, DataStore, FeatureType, I18nText, Layer, LayerGroup, Style, StyleFormat,
    WfsSettings, WmsSettings, Workspace,
};
use geobridge_testserver::TestServer;

fn client(server: &TestServer) -> GeoClient {
    GeoClient::new(&InstanceConfig::new(&server.url, "admin", "geoserver"))
}

fn seed_workspace(client: &GeoClient, name: &str) {
    let outcome = client.create_workspace(&Workspace::new(name)).unwrap();
    assert!(outcome.is_success());
}

fn seed_datastore(client: &GeoClient, workspace: &str, name: &str) {
    let store = DataStore::postgis(
        workspace, name, "db.example.ch", 5432, "gis", "geo", "secret", "public",
    );
    assert!(client.create_datastore(&store).unwrap().is_success());
}

#[test]
fn workspace_create_get_list() {
    let server = TestServer::start();
    let client = client(&server);

    assert!(matches!(
        client.get_workspace("demo").unwrap(),
        Outcome::NotFound
    ));
    seed_workspace(&client, "demo");
    seed_workspace(&client, "other");

    let ws = client.get_workspace("demo").unwrap().into_success().unwrap();
    assert_eq!(ws.name, "demo");
    let names = client.list_workspaces().unwrap();
    assert_eq!(names, vec!["demo", "other"]);
}

#[test]
fn create_twice_is_idempotent() {
    let server = TestServer::start();
    let client = client(&server);

    seed_workspace(&client, "demo");
    // Second create probes, finds 200 and takes the PUT path.
    let second = client.create_workspace(&Workspace::new("demo")).unwrap();
    assert!(second.is_success());
    assert_eq!(client.list_workspaces().unwrap(), vec!["demo"]);
}

#[test]
fn featuretype_roundtrips_i18n_title() {
    let server = TestServer::start();
    let client = client(&server);
    seed_workspace(&client, "demo");
    seed_datastore(&client, "demo", "pg");

    let featuretype = FeatureType::new("demo", "pg", "rivers")
        .with_srs("EPSG:2056")
        .with_title(I18nText::localized([("de", "Flüsse"), ("fr", "Rivières")]))
        .with_attribute(Attribute::new("geom", "org.locationtech.jts.geom.Point").required())
        .with_attribute(Attribute::new("id", "java.lang.Integer").required());
    assert!(client.create_featuretype(&featuretype).unwrap().is_success());

    let back = client
        .get_featuretype("demo", "pg", "rivers")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(back, featuretype);
    assert_eq!(
        client.list_featuretypes("demo", "pg").unwrap(),
        vec!["rivers"]
    );
}

#[test]
fn datastore_roundtrips_connection_parameters() {
    let server = TestServer::start();
    let client = client(&server);
    seed_workspace(&client, "demo");

    let store = DataStore::postgis(
        "demo", "pg", "db.example.ch", 5432, "gis", "geo", "secret", "public",
    );
    assert!(client.create_datastore(&store).unwrap().is_success());

    let back = client
        .get_datastore("demo", "pg")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(back.connection_parameters.get("dbtype"), Some("postgis"));
    assert_eq!(back.connection_parameters.get("port"), Some("5432"));
    assert_eq!(back, store);
}

#[test]
fn recursive_workspace_delete_cascades() {
    let server = TestServer::start();
    let client = client(&server);
    seed_workspace(&client, "demo");
    seed_datastore(&client, "demo", "pg");

    // Non-recursive delete of a populated workspace is a server error.
    let err = client.delete_workspace("demo", false).unwrap_err();
    assert!(matches!(
        err,
        geobridge_client::ClientError::Http { status: 403, .. }
    ));

    assert!(client.delete_workspace("demo", true).unwrap().is_success());
    assert!(matches!(
        client.get_workspace("demo").unwrap(),
        Outcome::NotFound
    ));
    assert!(matches!(
        client.get_datastore("demo", "pg").unwrap(),
        Outcome::NotFound
    ));
}

#[test]
fn style_metadata_and_body_roundtrip() {
    let server = TestServer::start();
    let client = client(&server);
    seed_workspace(&client, "demo");

    let style = Style::new("rivers-blue").in_workspace("demo");
    assert!(client.create_style(&style).unwrap().is_success());

    let sld = b"<StyledLayerDescriptor version=\"1.0.0\"/>";
    client
        .put_style_body(
            Some("demo"),
            "rivers-blue",
            StyleFormat::Sld.content_type(),
            sld,
        )
        .unwrap();

    let body = client
        .get_style_body(Some("demo"), "rivers-blue")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(body, sld);

    let back = client
        .get_style(Some("demo"), "rivers-blue")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(back.name, "rivers-blue");
    assert_eq!(back.format, StyleFormat::Sld);

    assert!(client
        .delete_style(Some("demo"), "rivers-blue", true)
        .unwrap()
        .is_success());
    assert!(matches!(
        client.get_style(Some("demo"), "rivers-blue").unwrap(),
        Outcome::NotFound
    ));
}

#[test]
fn publishing_creates_the_layer_record() {
    let server = TestServer::start();
    let client = client(&server);
    seed_workspace(&client, "demo");
    seed_datastore(&client, "demo", "pg");
    let featuretype = FeatureType::new("demo", "pg", "rivers");
    client.create_featuretype(&featuretype).unwrap();

    let layer = client
        .get_layer("demo", "rivers")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(layer.name, "rivers");

    let mut updated = layer;
    updated.default_style = Some("rivers-blue".to_owned());
    assert!(client.update_layer("demo", &updated).unwrap().is_success());
    let back = client
        .get_layer("demo", "rivers")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(back.default_style.as_deref(), Some("rivers-blue"));

    // Updating a layer that was never published is a plain NotFound-shaped
    // failure on the server side.
    let ghost = Layer::new("ghost");
    let outcome = client.update_layer("demo", &ghost);
    assert!(outcome.is_err());
}

#[test]
fn layergroup_lifecycle() {
    let server = TestServer::start();
    let client = client(&server);
    seed_workspace(&client, "demo");

    let group = LayerGroup::new("demo", "base-map")
        .with_member("rivers", "rivers-blue")
        .with_member("roads", "");
    assert!(client.create_layergroup(&group).unwrap().is_success());

    let back = client
        .get_layergroup("demo", "base-map")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(back, group);
    assert_eq!(client.list_layergroups("demo").unwrap(), vec!["base-map"]);

    assert!(client.delete_layergroup("demo", "base-map").unwrap().is_success());
    assert!(matches!(
        client.get_layergroup("demo", "base-map").unwrap(),
        Outcome::NotFound
    ));
}

#[test]
fn service_settings_put_get_delete() {
    let server = TestServer::start();
    let client = client(&server);
    seed_workspace(&client, "demo");

    assert!(matches!(
        client.get_wms_settings("demo").unwrap(),
        Outcome::NotFound
    ));

    let wms = WmsSettings::new("demo").with_default_locale("de");
    assert!(client.put_wms_settings(&wms).unwrap().is_success());
    let back = client
        .get_wms_settings("demo")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(back.default_locale.as_deref(), Some("de"));

    let wfs = WfsSettings::new("demo");
    assert!(client.put_wfs_settings(&wfs).unwrap().is_success());
    assert!(client.get_wfs_settings("demo").unwrap().is_success());

    assert!(client.delete_wms_settings("demo").unwrap().is_success());
    assert!(matches!(
        client.get_wms_settings("demo").unwrap(),
        Outcome::NotFound
    ));
}

#[test]
fn tile_cache_record_follows_the_layer() {
    let server = TestServer::start();
    let client = client(&server);
    seed_workspace(&client, "demo");
    seed_datastore(&client, "demo", "pg");
    client
        .create_featuretype(&FeatureType::new("demo", "pg", "rivers"))
        .unwrap();

    assert!(client.get_cached_layer("demo", "rivers").unwrap().is_success());
    assert!(matches!(
        client.get_cached_layer("demo", "ghost").unwrap(),
        Outcome::NotFound
    ));

    assert!(client
        .seed_layer("demo", "rivers", "EPSG:4326", "image/png", 0, 3)
        .unwrap()
        .is_success());
    assert!(client
        .truncate_layer("demo", "rivers", "EPSG:4326", "image/png")
        .unwrap()
        .is_success());
}
