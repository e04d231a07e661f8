//! Replication between two in-process reference servers.

use geobridge_client::{GeoClient, InstanceConfig, Outcome};
use geobridge_model::{
    Attribute, DataStore, FeatureType, I18nText, Layer, LayerGroup, Style, StyleFormat, Workspace,
};
use geobridge_sync::{SyncError, SyncJob, SyncOptions, SyncReport};
use geobridge_testserver::TestServer;

fn client(server: &TestServer) -> GeoClient {
    GeoClient::new(&InstanceConfig::new(&server.url, "admin", "geoserver"))
}

fn job(src: &TestServer, dst: &TestServer) -> SyncJob {
    SyncJob::new(client(src), client(dst))
}

const SLD: &[u8] = b"<StyledLayerDescriptor version=\"1.0.0\"/>";

/// Populate the source with one workspace carrying a style with a body, a
/// PostGIS datastore with a feature type, a shapefile store that must not
/// transfer, and a layer group.
fn seed_source(src: &GeoClient) {
    src.create_workspace(&Workspace::new("demo")).unwrap();

    let style = Style::new("rivers-blue").in_workspace("demo");
    src.create_style(&style).unwrap();
    src.put_style_body(Some("demo"), "rivers-blue", StyleFormat::Sld.content_type(), SLD)
        .unwrap();

    let store = DataStore::postgis(
        "demo", "pg", "db.example.ch", 5432, "gis", "geo", "secret", "public",
    );
    src.create_datastore(&store).unwrap();

    let mut shapefiles = DataStore::new("demo", "shapes");
    shapefiles.store_type = Some("Shapefile".to_owned());
    shapefiles.connection_parameters = [("dbtype", "shapefile"), ("url", "file:data/shapes")]
        .into_iter()
        .collect();
    src.create_datastore(&shapefiles).unwrap();

    let featuretype = FeatureType::new("demo", "pg", "rivers")
        .with_srs("EPSG:2056")
        .with_title(I18nText::localized([("de", "Flüsse"), ("fr", "Rivières")]))
        .with_attribute(Attribute::new("geom", "org.locationtech.jts.geom.Point").required())
        .with_attribute(Attribute::new("id", "java.lang.Integer").required());
    src.create_featuretype(&featuretype).unwrap();

    let mut layer = src
        .get_layer("demo", "rivers")
        .unwrap()
        .into_success()
        .unwrap();
    layer.default_style = Some("rivers-blue".to_owned());
    src.update_layer("demo", &layer).unwrap();

    let group = LayerGroup::new("demo", "base-map").with_member("rivers", "rivers-blue");
    src.create_layergroup(&group).unwrap();
}

#[test]
fn copy_workspace_replicates_everything() {
    let (source, destination) = (TestServer::start(), TestServer::start());
    let (src, dst) = (client(&source), client(&destination));
    seed_source(&src);

    let report = job(&source, &destination)
        .copy_workspace("demo", SyncOptions::default())
        .unwrap();

    assert_eq!(report.styles_copied, 1);
    assert_eq!(report.datastores_copied, 1);
    assert_eq!(report.datastores_skipped, 1); // the shapefile store
    assert_eq!(report.feature_types_copied, 1);
    assert_eq!(report.layer_groups_copied, 1);

    // The destination documents match the source's typed view, not a byte
    // copy of its wire payloads.
    let src_ft = src
        .get_featuretype("demo", "pg", "rivers")
        .unwrap()
        .into_success()
        .unwrap();
    let dst_ft = dst
        .get_featuretype("demo", "pg", "rivers")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(dst_ft, src_ft);

    let body = dst
        .get_style_body(Some("demo"), "rivers-blue")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(body, SLD);

    let layer: Layer = dst
        .get_layer("demo", "rivers")
        .unwrap()
        .into_success()
        .unwrap();
    assert_eq!(layer.default_style.as_deref(), Some("rivers-blue"));

    assert!(matches!(
        dst.get_datastore("demo", "shapes").unwrap(),
        Outcome::NotFound
    ));
    assert!(dst.get_layergroup("demo", "base-map").unwrap().is_success());
}

#[test]
fn copy_workspace_is_rerunnable() {
    let (source, destination) = (TestServer::start(), TestServer::start());
    seed_source(&client(&source));
    let job = job(&source, &destination);

    job.copy_workspace("demo", SyncOptions::default()).unwrap();
    // Second run takes the update path everywhere and still succeeds.
    let report = job.copy_workspace("demo", SyncOptions::default()).unwrap();
    assert_eq!(report.feature_types_copied, 1);
    assert_eq!(
        client(&destination).list_featuretypes("demo", "pg").unwrap(),
        vec!["rivers"]
    );
}

#[test]
fn selection_flags_limit_the_branches() {
    let (source, destination) = (TestServer::start(), TestServer::start());
    seed_source(&client(&source));

    let opts = SyncOptions {
        styles: true,
        datastores: false,
        layer_groups: false,
    };
    let report = job(&source, &destination).copy_workspace("demo", opts).unwrap();
    assert_eq!(report.styles_copied, 1);
    assert_eq!(report.datastores_copied, 0);
    assert_eq!(report.layer_groups_copied, 0);

    let dst = client(&destination);
    assert!(dst.get_style(Some("demo"), "rivers-blue").unwrap().is_success());
    assert!(matches!(
        dst.get_datastore("demo", "pg").unwrap(),
        Outcome::NotFound
    ));
}

#[test]
fn missing_source_workspace_is_a_dependency_error() {
    let (source, destination) = (TestServer::start(), TestServer::start());

    let err = job(&source, &destination)
        .copy_workspace("ghost", SyncOptions::default())
        .unwrap_err();
    assert!(err.is_dependency_missing());
    assert!(matches!(
        err,
        SyncError::WorkspaceMissing { side: "source", .. }
    ));
}

#[test]
fn branch_entrypoints_require_the_destination_workspace() {
    let (source, destination) = (TestServer::start(), TestServer::start());
    seed_source(&client(&source));

    let mut report = SyncReport::default();
    let err = job(&source, &destination)
        .copy_styles("demo", &mut report)
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::WorkspaceMissing {
            side: "destination",
            ..
        }
    ));
}

#[test]
fn feature_types_need_the_destination_datastore() {
    let (source, destination) = (TestServer::start(), TestServer::start());
    seed_source(&client(&source));
    client(&destination)
        .create_workspace(&Workspace::new("demo"))
        .unwrap();

    let mut report = SyncReport::default();
    let err = job(&source, &destination)
        .copy_feature_types("demo", "pg", &mut report)
        .unwrap_err();
    assert!(err.is_dependency_missing());
    assert!(matches!(err, SyncError::DatastoreMissing { .. }));
}
