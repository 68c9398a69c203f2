//! Deno Deploy client against a local mock server

mod common;

use common::can_bind_localhost;
use edgepush::domain::entities::DeployFiles;
use edgepush::domain::ports::{DeployApi, DeployRequest};
use edgepush::infrastructure::DenoDeployClient;
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;

fn client(server: &MockServer) -> DenoDeployClient {
    DenoDeployClient::new("ddp_token")
        .unwrap()
        .with_base_url(server.base_url())
}

fn files() -> DeployFiles {
    let mut files = DeployFiles::new();
    files.add("app.ts", b"export default {}".to_vec());
    files.add("a.wasm", vec![0, 97, 115, 109]);
    files
}

#[test]
fn lists_projects() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/projects")
            .header("authorization", "Bearer ddp_token");
        then.status(200)
            .json_body(json!([{ "id": "p1", "name": "hello" }]));
    });

    let projects = client(&server).list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "p1");
    assert_eq!(projects[0].name, "hello");
}

#[test]
fn negotiation_returns_missing_hashes() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let files = files();
    let manifest = files.manifest();
    let wasm_hash = files.get("a.wasm").unwrap().git_sha1.to_string();

    let server = MockServer::start();
    let negotiate = server.mock(|when, then| {
        when.method(POST)
            .path("/projects/p1/assets/negotiate")
            .body_contains("\"gitSha1\"")
            .body_contains("\"app.ts\"");
        then.status(200).json_body(json!([wasm_hash]));
    });

    let missing = client(&server).negotiate_assets("p1", &manifest).unwrap();
    negotiate.assert();
    assert_eq!(missing, vec![wasm_hash]);
}

#[test]
fn deployment_stream_reaches_callback() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/projects/p1/deployment_with_assets")
            .body_contains("name=\"request\"")
            .body_contains("file:///src/app.ts");
        then.status(200)
            .header("content-type", "application/x-ndjson")
            .body(
                "{\"type\":\"info\",\"message\":\"uploading\"}\n\
                 \n\
                 {\"type\":\"success\",\"id\":\"dep1\"}\n",
            );
    });

    let request = DeployRequest::production(files().manifest());
    let mut seen = Vec::new();
    client(&server)
        .deploy("p1", &request, &[b"export default {}".to_vec()], &mut |message| {
            seen.push(message["type"].as_str().unwrap_or_default().to_string());
            Ok(())
        })
        .unwrap();
    assert_eq!(seen, vec!["info", "success"]);
}

#[test]
fn failed_deployment_reports_status_and_body() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/projects/p1/deployment_with_assets");
        then.status(401).body("{\"code\":\"unauthorized\"}");
    });

    let request = DeployRequest::production(files().manifest());
    let err = client(&server)
        .deploy("p1", &request, &[], &mut |_| Ok(()))
        .unwrap_err();
    assert_eq!(err.kind(), "remote-call-failed");
    let message = err.to_string();
    assert!(message.contains("401"), "{message}");
    assert!(message.contains("unauthorized"), "{message}");
}
