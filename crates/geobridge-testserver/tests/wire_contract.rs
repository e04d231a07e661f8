//! Raw HTTP smoke tests against the reference server, without any client
//! crate in between, pinning the status codes and document shapes on the
//! wire.

use geobridge_testserver::TestServer;
use serde_json::{json, Value};
use std::io::Read;

fn agent() -> ureq::Agent {
    ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build(),
    )
}

fn get(agent: &ureq::Agent, url: &str) -> (u16, Vec<u8>, Option<String>) {
    let resp = agent.get(url).call().unwrap();
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let mut body = Vec::new();
    resp.into_body().into_reader().read_to_end(&mut body).unwrap();
    (status, body, content_type)
}

fn post_json(agent: &ureq::Agent, url: &str, doc: &Value) -> u16 {
    agent
        .post(url)
        .header("Content-Type", "application/json")
        .send(doc.to_string().as_bytes())
        .unwrap()
        .status()
        .as_u16()
}

#[test]
fn workspace_statuses_on_the_wire() {
    let server = TestServer::start();
    let agent = agent();
    let base = &server.url;

    let (status, _, _) = get(&agent, &format!("{base}/rest/workspaces/demo.json"));
    assert_eq!(status, 404);

    let doc = json!({"workspace": {"name": "demo"}});
    assert_eq!(
        post_json(&agent, &format!("{base}/rest/workspaces.json"), &doc),
        201
    );
    assert_eq!(
        post_json(&agent, &format!("{base}/rest/workspaces.json"), &doc),
        409
    );

    let (status, body, content_type) = get(&agent, &format!("{base}/rest/workspaces/demo.json"));
    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["workspace"]["name"], "demo");

    // Collections wrap the list in a plural-then-singular envelope.
    let (_, body, _) = get(&agent, &format!("{base}/rest/workspaces.json"));
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["workspaces"]["workspace"][0]["name"], "demo");
}

#[test]
fn style_body_lives_beside_its_metadata() {
    let server = TestServer::start();
    let agent = agent();
    let base = &server.url;
    post_json(
        &agent,
        &format!("{base}/rest/workspaces.json"),
        &json!({"workspace": {"name": "demo"}}),
    );
    post_json(
        &agent,
        &format!("{base}/rest/workspaces/demo/styles.json"),
        &json!({"style": {"name": "blue", "format": "sld"}}),
    );

    let sld = b"<StyledLayerDescriptor version=\"1.0.0\"/>";
    let status = agent
        .put(format!("{base}/rest/workspaces/demo/styles/blue"))
        .header("Content-Type", "application/vnd.ogc.sld+xml")
        .send(&sld[..])
        .unwrap()
        .status()
        .as_u16();
    assert_eq!(status, 200);

    // Without the .json suffix the style path serves the uploaded body,
    // with its original content type; with it, the metadata document.
    let (status, body, content_type) =
        get(&agent, &format!("{base}/rest/workspaces/demo/styles/blue"));
    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("application/vnd.ogc.sld+xml"));
    assert_eq!(body, sld);

    let (_, body, content_type) = get(
        &agent,
        &format!("{base}/rest/workspaces/demo/styles/blue.json"),
    );
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["style"]["name"], "blue");
}

#[test]
fn unknown_paths_are_plain_404s() {
    let server = TestServer::start();
    let agent = agent();

    let (status, _, _) = get(&agent, &format!("{}/nowhere", server.url));
    assert_eq!(status, 404);
    let (status, _, _) = get(&agent, &format!("{}/rest/nonsense.json", server.url));
    assert_eq!(status, 404);
}
