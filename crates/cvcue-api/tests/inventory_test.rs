#![allow(clippy::unwrap_used)]
// Integration tests for managed access point pagination using wiremock.

use std::num::NonZeroU32;

use futures_util::StreamExt;
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cvcue_api::{AccessPoint, ApiKeyCredentials, CueClient, Error, PageCursor, Session};

const APS_PATH: &str = "/wifi/api/manageddevices/aps";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CueClient, Session) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wifi/api/session"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "JSESSIONID=s3ss10n"))
        .mount(&server)
        .await;

    let base_url = Url::parse(&format!("{}/wifi/api/", server.uri())).unwrap();
    let client = CueClient::with_client(reqwest::Client::new(), base_url);
    let creds = ApiKeyCredentials::new("KEY-1", SecretString::from("secret".to_string()));
    let session = client.open_session(&creds).await.unwrap();

    (server, client, session)
}

fn size(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn device(i: usize) -> Value {
    json!({
        "name": format!("AP-{i}"),
        "ipAddress": format!("10.0.{}.{}", i / 256, i % 256),
        "macAddress": format!("00:11:74:00:{:02x}:{:02x}", i / 256, i % 256),
    })
}

fn page(range: std::ops::Range<usize>, total: usize) -> Value {
    json!({
        "managedDevices": range.map(device).collect::<Vec<_>>(),
        "totalCount": total,
    })
}

async fn mount_page(server: &MockServer, start: usize, body: Value) {
    Mock::given(method("GET"))
        .and(path(APS_PATH))
        .and(query_param("startindex", start.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn requested_start_indexes(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == APS_PATH)
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "startindex")
                .map(|(_, v)| v.into_owned())
        })
        .collect()
}

async fn collect_all(
    client: &CueClient,
    session: &Session,
    page_size: NonZeroU32,
) -> Vec<Result<AccessPoint, Error>> {
    client.fetch_all(session, page_size).collect().await
}

// ── Single page ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_page_sends_cookie_and_pagination() {
    let (server, client, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(APS_PATH))
        .and(query_param("pagesize", "2"))
        .and(query_param("startindex", "4"))
        .and(header("cookie", "JSESSIONID=s3ss10n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(4..6, 10)))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .fetch_page(&session, PageCursor::at(size(2), 4))
        .await
        .unwrap();

    assert_eq!(page.total_count, 10);
    assert_eq!(page.managed_devices.len(), 2);
    assert_eq!(page.managed_devices[0].name, "AP-4");
    assert_eq!(page.managed_devices[1].ip_address, "10.0.0.5");
}

#[tokio::test]
async fn test_fetch_page_is_repeatable() {
    let (server, client, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(APS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..3, 3)))
        .mount(&server)
        .await;

    let cursor = PageCursor::new(size(3));
    let first = client.fetch_page(&session, cursor).await.unwrap();
    let second = client.fetch_page(&session, cursor).await.unwrap();

    assert_eq!(first.managed_devices, second.managed_devices);
    assert_eq!(first.total_count, second.total_count);
}

#[tokio::test]
async fn test_fetch_page_undecodable_body() {
    let (server, client, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(APS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client
        .fetch_page(&session, PageCursor::new(size(100)))
        .await
        .unwrap_err();

    match err {
        Error::Decode { ref body, .. } => assert!(body.contains("maintenance")),
        other => panic!("expected Decode error, got: {other:?}"),
    }
}

// ── Full walk ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_all_walks_three_pages() {
    let (server, client, session) = setup().await;

    mount_page(&server, 0, page(0..100, 250)).await;
    mount_page(&server, 100, page(100..200, 250)).await;
    mount_page(&server, 200, page(200..250, 250)).await;

    let results = collect_all(&client, &session, size(100)).await;

    assert_eq!(results.len(), 250);
    let aps: Vec<AccessPoint> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(aps[0].name, "AP-0");
    assert_eq!(aps[249].name, "AP-249");
    assert!(aps.windows(2).all(|w| w[0].name != w[1].name));

    assert_eq!(requested_start_indexes(&server).await, ["0", "100", "200"]);
}

#[tokio::test]
async fn test_fetch_all_empty_inventory_requests_once() {
    let (server, client, session) = setup().await;

    mount_page(&server, 0, page(0..0, 0)).await;

    let results = collect_all(&client, &session, size(100)).await;

    assert!(results.is_empty());
    assert_eq!(requested_start_indexes(&server).await, ["0"]);
}

#[tokio::test]
async fn test_fetch_all_exact_multiple() {
    let (server, client, session) = setup().await;

    mount_page(&server, 0, page(0..2, 4)).await;
    mount_page(&server, 2, page(2..4, 4)).await;

    let results = collect_all(&client, &session, size(2)).await;

    assert_eq!(results.len(), 4);
    assert_eq!(requested_start_indexes(&server).await, ["0", "2"]);
}

#[tokio::test]
async fn test_fetch_all_ignores_short_pages() {
    // Termination follows totalCount, not page fullness: a short middle
    // page must not end the walk early.
    let (server, client, session) = setup().await;

    mount_page(&server, 0, page(0..1, 5)).await;
    mount_page(&server, 3, page(3..5, 5)).await;

    let names: Vec<String> = collect_all(&client, &session, size(3))
        .await
        .into_iter()
        .map(|r| r.unwrap().name)
        .collect();

    assert_eq!(names, ["AP-0", "AP-3", "AP-4"]);
}

#[tokio::test]
async fn test_fetch_all_stops_on_mid_walk_failure() {
    let (server, client, session) = setup().await;

    mount_page(&server, 0, page(0..100, 250)).await;

    Mock::given(method("GET"))
        .and(path(APS_PATH))
        .and(query_param("startindex", "100"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(APS_PATH))
        .and(query_param("startindex", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(200..250, 250)))
        .expect(0)
        .mount(&server)
        .await;

    let mut results = collect_all(&client, &session, size(100)).await;

    assert_eq!(results.len(), 101);
    let err = results.pop().unwrap().unwrap_err();
    assert!(results.iter().all(Result::is_ok));

    match err {
        Error::Retrieval { ref url, .. } => {
            assert_eq!(url.path(), APS_PATH);
            assert_eq!(url.query(), Some("pagesize=100&startindex=100"));
        }
        ref other => panic!("expected Retrieval error, got: {other:?}"),
    }
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_fetch_all_is_lazy() {
    let (server, client, session) = setup().await;

    mount_page(&server, 0, page(0..2, 6)).await;

    Mock::given(method("GET"))
        .and(path(APS_PATH))
        .and(query_param("startindex", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(2..4, 6)))
        .expect(0)
        .mount(&server)
        .await;

    let stream = client.fetch_all(&session, size(2));
    let first_two: Vec<_> = stream.take(2).collect().await;

    assert_eq!(first_two.len(), 2);
    assert_eq!(requested_start_indexes(&server).await, ["0"]);
}
