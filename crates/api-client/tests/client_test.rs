//! End-to-end tests of the client against a stubbed marketplace API

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use std::time::Duration;
use tgtg_api_client::{ApiError, ClientConfig, Coordinates, RenewalStrategy, TgtgClient};

const LOGIN_PATH: &str = "/auth/v3/authByEmail";
const REFRESH_PATH: &str = "/auth/v3/token/refresh";
const LOCATIONS_PATH: &str = "/location/v1/search";
const STORES_PATH: &str = "/item/v7/";

fn auth_body(access_token: &str, ttl_secs: u64) -> String {
    json!({
        "access_token": access_token,
        "refresh_token": format!("{access_token}-refresh"),
        "access_token_ttl_seconds": ttl_secs,
        "startup_data": { "user": { "user_id": "U" } }
    })
    .to_string()
}

async fn mock_login(
    server: &mut ServerGuard,
    access_token: &str,
    ttl_secs: u64,
    hits: usize,
) -> Mock {
    server
        .mock("POST", LOGIN_PATH)
        .match_body(Matcher::PartialJson(json!({
            "email": "me@example.com",
            "password": "secret"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(auth_body(access_token, ttl_secs))
        .expect(hits)
        .create_async()
        .await
}

fn client_for(server: &ServerGuard) -> TgtgClient {
    client_with(server, ClientConfig::default())
}

fn client_with(server: &ServerGuard, config: ClientConfig) -> TgtgClient {
    let config = config
        .with_base_url(server.url())
        .with_timeout(Duration::from_secs(5));
    TgtgClient::with_config("me@example.com", "secret", config).unwrap()
}

#[tokio::test]
async fn test_find_locations_preserves_order_and_fields() {
    let mut server = mockito::Server::new_async().await;
    let login = mock_login(&mut server, "A", 3600, 1).await;
    let locations = server
        .mock("POST", LOCATIONS_PATH)
        .match_header("authorization", "Bearer A")
        .match_body(Matcher::Json(json!({ "query": "Ams" })))
        .with_status(200)
        .with_body(
            json!({
                "results": [
                    { "name": "Amsterdam", "location": { "latitude": 52.37, "longitude": 4.89 } },
                    { "name": "Amstelveen", "location": { "latitude": 52.30, "longitude": 4.86 } },
                    { "name": "Amersfoort", "location": { "latitude": 52.15, "longitude": 5.38 } }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let found = client.find_locations("Ams").await.unwrap();

    let names: Vec<_> = found.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["Amsterdam", "Amstelveen", "Amersfoort"]);
    assert_eq!(found[2].coordinates, Coordinates::new(52.15, 5.38));
    login.assert_async().await;
    locations.assert_async().await;
}

#[tokio::test]
async fn test_find_stores_maps_container() {
    let mut server = mockito::Server::new_async().await;
    let _login = mock_login(&mut server, "A", 3600, 1).await;
    let stores = server
        .mock("POST", STORES_PATH)
        .match_header("authorization", "Bearer A")
        .match_body(Matcher::Json(json!({
            "user_id": "U",
            "origin": { "latitude": 52.3, "longitude": 4.9 },
            "radius": 5.0
        })))
        .with_status(200)
        .with_body(
            json!({
                "items": [{
                    "store": { "store_id": "42", "store_name": "Bakery", "website": "https://bakery.example" },
                    "item": { "description": "Bread bag" },
                    "distance": 1.2,
                    "favorite": true,
                    "pickup_location": {
                        "address": { "address_line": "Main St", "city": "Town", "postal_code": "1000" },
                        "location": { "latitude": 52.31, "longitude": 4.91 }
                    }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let found = client
        .find_stores(Coordinates::new(52.3, 4.9), 5.0)
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    let store = &found[0];
    assert_eq!(store.id, "42");
    assert!((store.distance - 1.2).abs() < f64::EPSILON);
    assert!(store.favourited);
    assert_eq!(store.address.address_line, "Main St");
    assert_eq!(store.address.city, "Town");
    assert_eq!(store.address.postcode, "1000");
    stores.assert_async().await;
}

#[tokio::test]
async fn test_concurrent_calls_log_in_once() {
    let mut server = mockito::Server::new_async().await;
    let login = mock_login(&mut server, "A", 3600, 1).await;
    let locations = server
        .mock("POST", LOCATIONS_PATH)
        .match_header("authorization", "Bearer A")
        .with_status(200)
        .with_body(r#"{ "results": [] }"#)
        .expect(10)
        .create_async()
        .await;

    let client = client_for(&server);
    let results =
        futures::future::join_all((0..10).map(|_| client.find_locations("Amsterdam"))).await;

    assert!(results.iter().all(Result::is_ok));
    login.assert_async().await;
    locations.assert_async().await;
}

#[tokio::test]
async fn test_cached_token_is_reused_across_calls() {
    let mut server = mockito::Server::new_async().await;
    let login = mock_login(&mut server, "A", 3600, 1).await;
    let _locations = server
        .mock("POST", LOCATIONS_PATH)
        .with_status(200)
        .with_body(r#"{ "results": [] }"#)
        .expect(3)
        .create_async()
        .await;

    let client = client_for(&server);
    for _ in 0..3 {
        client.find_locations("Amsterdam").await.unwrap();
    }

    login.assert_async().await;
}

#[tokio::test]
async fn test_short_lived_token_is_refreshed() {
    let mut server = mockito::Server::new_async().await;
    // A 30s token is already inside the 60s refresh margin.
    let login = mock_login(&mut server, "A", 30, 1).await;
    let refresh = server
        .mock("POST", REFRESH_PATH)
        .match_body(Matcher::Json(json!({ "refresh_token": "A-refresh" })))
        .with_status(200)
        .with_body(auth_body("B", 3600))
        .expect(1)
        .create_async()
        .await;
    let locations_with_refreshed = server
        .mock("POST", LOCATIONS_PATH)
        .match_header("authorization", "Bearer B")
        .with_status(200)
        .with_body(r#"{ "results": [] }"#)
        .expect(1)
        .create_async()
        .await;
    let _locations = server
        .mock("POST", LOCATIONS_PATH)
        .match_header("authorization", "Bearer A")
        .with_status(200)
        .with_body(r#"{ "results": [] }"#)
        .create_async()
        .await;

    let client = client_for(&server);
    client.find_locations("first").await.unwrap();
    client.find_locations("second").await.unwrap();

    login.assert_async().await;
    refresh.assert_async().await;
    locations_with_refreshed.assert_async().await;
    assert_eq!(
        client.token_provider().cached().unwrap().access_token(),
        "B"
    );
}

#[tokio::test]
async fn test_rejected_refresh_falls_back_to_login() {
    let mut server = mockito::Server::new_async().await;
    let login = mock_login(&mut server, "A", 30, 2).await;
    let refresh = server
        .mock("POST", REFRESH_PATH)
        .with_status(401)
        .with_body("refresh token revoked")
        .expect(1)
        .create_async()
        .await;
    let _locations = server
        .mock("POST", LOCATIONS_PATH)
        .with_status(200)
        .with_body(r#"{ "results": [] }"#)
        .create_async()
        .await;

    let client = client_for(&server);
    client.find_locations("first").await.unwrap();
    client.find_locations("second").await.unwrap();

    login.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_always_login_strategy_never_refreshes() {
    let mut server = mockito::Server::new_async().await;
    let login = mock_login(&mut server, "A", 30, 2).await;
    let refresh = server
        .mock("POST", REFRESH_PATH)
        .expect(0)
        .create_async()
        .await;
    let _locations = server
        .mock("POST", LOCATIONS_PATH)
        .with_status(200)
        .with_body(r#"{ "results": [] }"#)
        .create_async()
        .await;

    let client = client_with(
        &server,
        ClientConfig::default().with_renewal(RenewalStrategy::AlwaysLogin),
    );
    client.find_locations("first").await.unwrap();
    client.find_locations("second").await.unwrap();

    login.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_bad_credentials_surface_as_authentication_failed() {
    let mut server = mockito::Server::new_async().await;
    let _login = server
        .mock("POST", LOGIN_PATH)
        .with_status(401)
        .with_body("invalid credentials")
        .create_async()
        .await;
    let locations = server
        .mock("POST", LOCATIONS_PATH)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.find_locations("Amsterdam").await.unwrap_err();

    assert!(err.is_auth_error(), "unexpected error: {err:?}");
    assert_eq!(err.status(), Some(401));
    locations.assert_async().await;
}

#[tokio::test]
async fn test_business_failure_is_request_failed() {
    let mut server = mockito::Server::new_async().await;
    let _login = mock_login(&mut server, "A", 3600, 1).await;
    let _stores = server
        .mock("POST", STORES_PATH)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .find_stores(Coordinates::new(52.3, 4.9), 5.0)
        .await
        .unwrap_err();

    match err {
        ApiError::RequestFailed { endpoint, status, .. } => {
            assert_eq!(endpoint, "item/v7/");
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_shape_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _login = mock_login(&mut server, "A", 3600, 1).await;
    let _locations = server
        .mock("POST", LOCATIONS_PATH)
        .with_status(200)
        .with_body(r#"{ "locations": "nope" }"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.find_locations("Amsterdam").await.unwrap_err();

    assert!(err.is_decode_error(), "unexpected error: {err:?}");
    assert_eq!(err.endpoint(), Some("location/v1/search"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:1")
        .with_timeout(Duration::from_secs(2));
    let client = TgtgClient::with_config("me@example.com", "secret", config).unwrap();

    let err = client.find_locations("Amsterdam").await.unwrap_err();

    assert!(err.is_network_error(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_close_twice_makes_no_network_call() {
    let mut server = mockito::Server::new_async().await;
    let login = mock_login(&mut server, "A", 3600, 1).await;
    let _locations = server
        .mock("POST", LOCATIONS_PATH)
        .with_status(200)
        .with_body(r#"{ "results": [] }"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    client.find_locations("Amsterdam").await.unwrap();

    client.close();
    client.close();

    assert!(client.token_provider().cached().is_none());
    assert!(matches!(
        client.find_locations("Amsterdam").await,
        Err(ApiError::Closed)
    ));
    login.assert_async().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_close_during_login_discards_token_and_skips_call() {
    let mut server = mockito::Server::new_async().await;
    let _login = server
        .mock("POST", LOGIN_PATH)
        .with_status(200)
        .with_body_from_request(|_| {
            std::thread::sleep(Duration::from_millis(300));
            auth_body("A", 3600).into_bytes()
        })
        .create_async()
        .await;
    let locations = server
        .mock("POST", LOCATIONS_PATH)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.find_locations("Amsterdam").await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    client.close();

    let result = pending.await.unwrap();
    assert!(matches!(result, Err(ApiError::Closed)), "unexpected result: {result:?}");
    assert!(client.token_provider().cached().is_none());
    locations.assert_async().await;
}
