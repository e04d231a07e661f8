//! OGC operations against an in-process reference server: capability
//! introspection with title fallback, map/tile fetching and the WFS
//! transaction round trip.

use geobridge_client::{GeoClient, InstanceConfig};
use geobridge_model::bbox::{BoundingBox, CrsRef};
use geobridge_model::{Attribute, DataStore, FeatureType, I18nText, WmsSettings};
use geobridge_ogc::{
    capabilities, wfs, wms, wmts, GetMapRequest, GetTileRequest, OgcError, I18N_CONTENT_MISSING,
};
use geobridge_testserver::TestServer;
use serde_json::json;

fn client(server: &TestServer) -> GeoClient {
    GeoClient::new(&InstanceConfig::new(&server.url, "admin", "geoserver"))
}

/// One workspace with a localized-title layer and a plain-title layer.
fn seed(client: &GeoClient) {
    client
        .create_workspace(&geobridge_model::Workspace::new("demo"))
        .unwrap();
    client
        .create_datastore(&DataStore::postgis(
            "demo", "pg", "db.example.ch", 5432, "gis", "geo", "secret", "public",
        ))
        .unwrap();

    let mut rivers = FeatureType::new("demo", "pg", "rivers")
        .with_srs("EPSG:2056")
        .with_title(I18nText::localized([("de", "Flüsse"), ("fr", "Rivières")]))
        .with_attribute(Attribute::new("geom", "org.locationtech.jts.geom.Point").required())
        .with_attribute(Attribute::new("id", "java.lang.Integer").required())
        .with_attribute(Attribute::new("title", "java.lang.String"));
    rivers.lat_lon_bounding_box = Some(BoundingBox::new(
        5.9,
        45.8,
        10.5,
        47.8,
        Some(CrsRef::epsg(4326)),
    ));
    client.create_featuretype(&rivers).unwrap();

    let roads = FeatureType::new("demo", "pg", "roads").with_title("Roads");
    client.create_featuretype(&roads).unwrap();
}

#[test]
fn capabilities_report_titles_per_language() {
    let server = TestServer::start();
    let client = client(&server);
    seed(&client);

    let layers = capabilities::wms_layers(&client, "demo", Some("fr")).unwrap();
    assert_eq!(layers.len(), 2);
    let rivers = layers.iter().find(|l| l.name == "demo:rivers").unwrap();
    assert_eq!(rivers.title.as_deref(), Some("Rivières"));
    assert_eq!(rivers.bbox, Some((5.9, 45.8, 10.5, 47.8)));

    // Plain titles are language-independent.
    let roads = layers.iter().find(|l| l.name == "demo:roads").unwrap();
    assert_eq!(roads.title.as_deref(), Some("Roads"));
}

#[test]
fn missing_language_falls_back_to_the_marker() {
    let server = TestServer::start();
    let client = client(&server);
    seed(&client);

    // No Romansh title, no plain default: the marker shows through.
    let layers = capabilities::wms_layers(&client, "demo", Some("rm")).unwrap();
    let rivers = layers.iter().find(|l| l.name == "demo:rivers").unwrap();
    assert_eq!(rivers.title.as_deref(), Some(I18N_CONTENT_MISSING));
    assert!(rivers.title_is_missing_marker());

    // A workspace default locale fills the gap before the marker applies.
    client
        .put_wms_settings(&WmsSettings::new("demo").with_default_locale("de"))
        .unwrap();
    let layers = capabilities::wms_layers(&client, "demo", Some("rm")).unwrap();
    let rivers = layers.iter().find(|l| l.name == "demo:rivers").unwrap();
    assert_eq!(rivers.title.as_deref(), Some("Flüsse"));
}

#[test]
fn get_map_returns_pixels_or_a_typed_exception() {
    let server = TestServer::start();
    let client = client(&server);
    seed(&client);

    let request = GetMapRequest::new(
        vec!["demo:rivers".to_owned()],
        (5.9, 45.8, 10.5, 47.8),
        256,
        256,
    );
    let resp = wms::get_map(&client, "demo", &request).unwrap();
    assert_eq!(resp.content_type.as_deref(), Some("image/png"));
    assert_eq!(&resp.body[..4], &[0x89, 0x50, 0x4E, 0x47]);

    let bad = GetMapRequest::new(
        vec!["demo:ghost".to_owned()],
        (5.9, 45.8, 10.5, 47.8),
        256,
        256,
    );
    let err = wms::get_map(&client, "demo", &bad).unwrap_err();
    assert!(matches!(err, OgcError::Service { .. }));
}

#[test]
fn legend_graphic_follows_the_layer() {
    let server = TestServer::start();
    let client = client(&server);
    seed(&client);

    let resp =
        wms::get_legend_graphic(&client, "demo", "demo:rivers", "image/png", None).unwrap();
    assert_eq!(resp.content_type.as_deref(), Some("image/png"));

    let err = wms::get_legend_graphic(&client, "demo", "demo:ghost", "image/png", None);
    assert!(matches!(err, Err(OgcError::Service { .. })));
}

#[test]
fn wfs_insert_get_delete_roundtrip() {
    let server = TestServer::start();
    let client = client(&server);
    seed(&client);

    let before = wfs::get_feature(&client, "demo", "demo:rivers", None).unwrap();
    assert_eq!(before["features"], json!([]));

    let insert = wfs::insert_transaction(
        "demo",
        "rivers",
        "geom",
        (2_600_000.0, 1_200_000.0),
        2056,
        &[
            wfs::FeatureAttribute::new("id", "10"),
            wfs::FeatureAttribute::new("title", "Title"),
        ],
    );
    let summary = wfs::transaction(&client, "demo", &insert).unwrap();
    assert_eq!(
        summary["TransactionResponse"]["TransactionSummary"]["totalInserted"],
        "1"
    );

    let collection = wfs::get_feature(&client, "demo", "demo:rivers", None).unwrap();
    let features = collection["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["id"], json!(10));
    assert_eq!(features[0]["properties"]["title"], json!("Title"));
    assert_eq!(
        features[0]["geometry"],
        json!({"type": "Point", "coordinates": [2_600_000.0, 1_200_000.0]})
    );

    let values = wfs::get_property_value(&client, "demo", "demo:rivers", "title").unwrap();
    assert_eq!(values["ValueCollection"]["member"]["title"], "Title");

    let delete = wfs::delete_transaction("demo", "rivers", "id", "10");
    let summary = wfs::transaction(&client, "demo", &delete).unwrap();
    assert_eq!(
        summary["TransactionResponse"]["TransactionSummary"]["totalDeleted"],
        "1"
    );

    let after = wfs::get_feature(&client, "demo", "demo:rivers", None).unwrap();
    assert_eq!(after["features"], json!([]));
}

#[test]
fn describe_feature_type_lists_attributes() {
    let server = TestServer::start();
    let client = client(&server);
    seed(&client);

    let schema = wfs::describe_feature_type(&client, "demo", Some("demo:rivers")).unwrap();
    let complex = &schema["Schema"]["ComplexType"];
    assert_eq!(complex["@name"], "rivers");
    let elements = complex["Element"].as_array().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[1]["@name"], "id");
}

#[test]
fn feature_info_returns_features_at_the_point() {
    let server = TestServer::start();
    let client = client(&server);
    seed(&client);

    let insert = wfs::insert_transaction(
        "demo",
        "rivers",
        "geom",
        (2_600_000.0, 1_200_000.0),
        2056,
        &[wfs::FeatureAttribute::new("id", "1")],
    );
    wfs::transaction(&client, "demo", &insert).unwrap();

    let map = GetMapRequest::new(
        vec!["demo:rivers".to_owned()],
        (5.9, 45.8, 10.5, 47.8),
        256,
        256,
    );
    let info = wms::get_feature_info(&client, "demo", &wms::GetFeatureInfoRequest::new(map, 128, 128))
        .unwrap();
    let doc = info.as_json().unwrap();
    assert_eq!(doc["numberReturned"], json!(1));
}

#[test]
fn tile_cache_result_transitions_miss_to_hit() {
    let server = TestServer::start();
    let client = client(&server);
    seed(&client);

    let request = GetTileRequest::new("demo:rivers", "EPSG:4326", 3, 2, 5);
    let first = wmts::get_tile(&client, &request).unwrap();
    assert_eq!(first.cache_result.as_deref(), Some("MISS"));

    let second = wmts::get_tile(&client, &request).unwrap();
    assert_eq!(second.cache_result.as_deref(), Some("HIT"));

    // A different tile of the same layer is its own cache entry.
    let other = GetTileRequest::new("demo:rivers", "EPSG:4326", 3, 2, 6);
    assert_eq!(wmts::get_tile(&client, &other).unwrap().cache_result.as_deref(), Some("MISS"));

    // Truncating the layer resets every entry.
    client
        .truncate_layer("demo", "rivers", "EPSG:4326", "image/png")
        .unwrap();
    let again = wmts::get_tile(&client, &request).unwrap();
    assert_eq!(again.cache_result.as_deref(), Some("MISS"));
}
