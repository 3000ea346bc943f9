// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Router dispatch end-to-end: retry/backoff to eventual success, and the
//! opaque-only identity-cutoff guarantee at the wire level. Uses a small
//! hand-rolled HTTP/1.1 stub server rather than a mocking crate, in the same
//! style as the antivirus gateway's own stream-protocol tests.

mod common;

use chrono::Utc;
use hmac::{Hmac, Mac};
use sas::infrastructure::adapters::{HmacSha256Signer, WebhookClient};
use sas::infrastructure::repositories::schema::initialize_database;
use sas::infrastructure::repositories::SqliteRouteRepository;
use sas::infrastructure::runtime::RouterDispatcher;
use sas_domain::repositories::RouteRepository;
use sas_domain::services::Signer;
use sas_domain::{AuthMode, DossierId, PendingRoute, RouteUrl, Sha256Digest};
use sha2::Sha256;
use std::sync::Arc;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

type HmacSha256 = Hmac<Sha256>;

struct RecordedRequest {
    headers: String,
    body: Vec<u8>,
}

/// Accepts `responses.len()` sequential connections on a fresh listener,
/// replying with each status line in turn and forwarding what it read to
/// `tx`. Each request is read as a fixed-size buffer read, which is enough
/// for the small JSON payloads this pipeline sends.
async fn spawn_stub_server(responses: Vec<&'static str>) -> (std::net::SocketAddr, mpsc::UnboundedReceiver<RecordedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for status_line in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 64 * 1024];
            let read = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..read]).to_string();
            let (headers, body) = request.split_once("\r\n\r\n").unwrap_or((request.as_str(), ""));

            let response = format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            tx.send(RecordedRequest {
                headers: headers.to_string(),
                body: body.as_bytes().to_vec(),
            })
            .ok();
        }
    });

    (addr, rx)
}

async fn route_repo() -> Arc<dyn RouteRepository> {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("routes.db");
    let pool = initialize_database(&format!("sqlite://{}", db_path.display())).await.unwrap();
    std::mem::forget(dir); // keep the temp file alive for the pool's lifetime
    Arc::new(SqliteRouteRepository::new(pool))
}

#[tokio::test]
async fn retry_then_success_delivers_on_the_third_attempt() {
    let (addr, mut received) = spawn_stub_server(vec!["500 Internal Server Error", "500 Internal Server Error", "200 OK"]).await;

    let routes = route_repo().await;
    let route = PendingRoute::new(
        Sha256Digest::of_bytes(b"retry-then-success"),
        DossierId::parse("dos_retry").unwrap(),
        RouteUrl::parse(format!("http://{addr}/hook")).unwrap(),
        AuthMode::OpaqueOnly,
        false,
        None,
        None,
        2048,
        Some("application/pdf".to_string()),
        Utc::now(),
    );
    routes.insert_route(&route).await.unwrap();

    let dispatcher = RouterDispatcher::new(routes.clone(), Arc::new(WebhookClient::new()), Arc::new(HmacSha256Signer::new()), 1);

    // First attempt fails (500); the route is re-armed with a ~2s backoff.
    let attempted = dispatcher.dispatch_once().await.unwrap();
    assert_eq!(attempted, 1);
    received.recv().await.unwrap();

    let due = routes.list_routes_due(Utc::now()).await.unwrap();
    assert!(due.is_empty(), "route must not be immediately retryable after a failure");
    let armed = routes.list_routes_due(Utc::now() + chrono::Duration::seconds(3)).await.unwrap();
    assert_eq!(armed.len(), 1);
    assert_eq!(armed[0].attempts, 1);

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    // Second attempt also fails (500); attempts climbs to 2 with ~4s backoff.
    let attempted = dispatcher.dispatch_once().await.unwrap();
    assert_eq!(attempted, 1);
    received.recv().await.unwrap();

    let armed = routes.list_routes_due(Utc::now() + chrono::Duration::seconds(5)).await.unwrap();
    assert_eq!(armed.len(), 1);
    assert_eq!(armed[0].attempts, 2);

    tokio::time::sleep(std::time::Duration::from_secs(5)).await;

    // Third attempt succeeds; the route row is deleted entirely.
    let attempted = dispatcher.dispatch_once().await.unwrap();
    assert_eq!(attempted, 1);
    received.recv().await.unwrap();

    let gone = routes.list_routes_due(Utc::now() + chrono::Duration::seconds(600)).await.unwrap();
    assert!(gone.is_empty(), "a successfully delivered route must be removed, not merely marked done");
}

#[tokio::test]
async fn opaque_only_route_never_sends_authorization_and_body_omits_owner_principal() {
    let (addr, mut received) = spawn_stub_server(vec!["200 OK"]).await;

    let routes = route_repo().await;
    let route = PendingRoute::new(
        Sha256Digest::of_bytes(b"opaque-only-safety"),
        DossierId::parse("dos_opaque").unwrap(),
        RouteUrl::parse(format!("http://{addr}/hook")).unwrap(),
        AuthMode::OpaqueOnly,
        false,
        // A carried token sneaking in upstream must still be stripped.
        Some("should-never-be-sent".to_string()),
        Some("shared-secret".to_string()),
        12345,
        Some("image/jpeg".to_string()),
        Utc::now(),
    );
    routes.insert_route(&route).await.unwrap();

    let dispatcher = RouterDispatcher::new(routes.clone(), Arc::new(WebhookClient::new()), Arc::new(HmacSha256Signer::new()), 1);
    dispatcher.dispatch_once().await.unwrap();

    let request = received.recv().await.unwrap();
    assert!(
        !request.headers.to_ascii_lowercase().contains("authorization"),
        "opaque_only delivery must never carry an Authorization header"
    );

    let parsed: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert!(!parsed.as_object().unwrap().contains_key("owner_principal"));
    assert_ne!(parsed["dossier_id"].as_str().unwrap(), "should-never-be-sent");
    assert_eq!(parsed["size_bytes"].as_u64().unwrap(), 12345);
    assert_eq!(parsed["mime"].as_str().unwrap(), "image/jpeg");
}

#[tokio::test]
async fn signed_request_carries_a_valid_hmac_signature_over_the_exact_body_bytes() {
    let (addr, mut received) = spawn_stub_server(vec!["200 OK"]).await;

    let secret = "webhook-shared-secret";
    let routes = route_repo().await;
    let route = PendingRoute::new(
        Sha256Digest::of_bytes(b"hmac-check"),
        DossierId::parse("dos_hmac").unwrap(),
        RouteUrl::parse(format!("http://{addr}/hook")).unwrap(),
        AuthMode::OpaqueOnly,
        false,
        None,
        Some(secret.to_string()),
        777,
        None,
        Utc::now(),
    );
    routes.insert_route(&route).await.unwrap();

    let dispatcher = RouterDispatcher::new(routes.clone(), Arc::new(WebhookClient::new()), Arc::new(HmacSha256Signer::new()), 1);
    dispatcher.dispatch_once().await.unwrap();

    let request = received.recv().await.unwrap();
    let signature_header = request
        .headers
        .lines()
        .find(|line| line.to_ascii_lowercase().starts_with("x-signature-256:"))
        .expect("signed route must carry X-Signature-256")
        .split_once(':')
        .unwrap()
        .1
        .trim()
        .to_string();
    let hex_sig = signature_header.strip_prefix("sha256=").expect("signature is sha256-prefixed");

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(&request.body);
    let expected = hex::encode(mac.finalize().into_bytes());
    assert_eq!(hex_sig, expected);
}

#[tokio::test]
async fn a_route_that_exhausts_its_retry_budget_is_never_delivered_again() {
    let (addr, mut received) = spawn_stub_server(vec![
        "500 Internal Server Error",
        "500 Internal Server Error",
        "500 Internal Server Error",
        "500 Internal Server Error",
        "500 Internal Server Error",
    ])
    .await;

    let routes = route_repo().await;
    let mut route = PendingRoute::new(
        Sha256Digest::of_bytes(b"poisoned-route"),
        DossierId::parse("dos_poison").unwrap(),
        RouteUrl::parse(format!("http://{addr}/hook")).unwrap(),
        AuthMode::OpaqueOnly,
        false,
        None,
        None,
        1,
        None,
        Utc::now(),
    );
    // Drive straight to the poisoned threshold without waiting out five
    // real backoff windows: record_failure is the same state transition
    // dispatch_once drives, just applied directly five times.
    let now = Utc::now();
    for _ in 0..5 {
        route.record_failure("simulated failure", now);
    }
    assert!(route.is_poisoned());
    routes.insert_route(&route).await.unwrap();

    let due = routes.list_routes_due(Utc::now() + chrono::Duration::hours(1)).await.unwrap();
    assert!(due.is_empty(), "a route with attempts = 5 must never be selected for delivery again");

    drop(received);
    drop(addr);
}
