//! End-to-end wiring of configuration, health endpoints and cache clients.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use service_kit::cache::{CacheClient, CacheValue};
use service_kit::cassandra::{ClusterSettings, HostSelectionPolicy};
use service_kit::config::{Parameter, StringParameter, UrlParameter};
use service_kit::health::{DEPENDENCY_CASSANDRA, DEPENDENCY_REDIS, Dispatcher, INFO_URL, STATUS_URL};
use service_kit::http::Router;
use service_kit::jwt::TokenSigner;
use service_kit::logging::Severity;
use test_utils::fixtures;
use test_utils::mocks::{RecordingCache, ToggleChecker};
use tower::ServiceExt;

#[test]
fn test_full_configuration_parses() {
    let config = fixtures::parsed_config().unwrap();

    let cassandra = config.cassandra_connection_info().unwrap();
    assert_eq!(cassandra.hosts(), ["host1.com:1234", "host2.com:2345"]);
    assert_eq!(cassandra.keyspace(), "cards");
    assert_eq!(cassandra.data_center(), "US");

    let redis = config.redis_connection_info().unwrap();
    assert_eq!(redis.address(), "host1.com:2345");

    assert_eq!(config.private_key_info().unwrap().decoded_value(), b"private-key");
    assert_eq!(
        config.private_key_password_info().unwrap().decoded_value(),
        b"passphrase"
    );
    assert_eq!(config.log_info().unwrap().severity(), Severity::Debug);
    assert_eq!(config.get_value(&Parameter::PUBLIC_KEY), "public-key");

    let portal = config.get::<UrlParameter>(&Parameter::DEV_PORTAL_URL).unwrap();
    assert_eq!(portal.not_versioned_url().unwrap(), "https://developer.example.com");

    let address = config.get::<StringParameter>(&Parameter::HTTP_ADDRESS).unwrap();
    assert_eq!(address.value(), "127.0.0.1:8080");
}

#[test]
fn test_parsed_values_feed_adapters() {
    let config = fixtures::parsed_config().unwrap();

    let settings = ClusterSettings::from_connection_info(config.cassandra_connection_info().unwrap());
    assert_eq!(
        settings.policy(),
        &HostSelectionPolicy::DcAwareRoundRobin {
            local_dc: "US".to_string()
        }
    );
    assert_eq!(settings.credentials().unwrap().username(), "user");

    let signer = TokenSigner::from_key_parameter(config.private_key_info().unwrap());
    let exp = chrono::Utc::now().timestamp() + 60;
    let token = signer.sign(&serde_json::json!({"sub": "cards", "exp": exp})).unwrap();
    let claims: serde_json::Value = signer.verify(&token).unwrap();
    assert_eq!(claims["sub"], "cards");
}

#[tokio::test]
async fn test_health_routes_follow_dependency_state() {
    let redis = ToggleChecker::healthy();
    let mut dispatcher = Dispatcher::new(fixtures::build_version());
    dispatcher.register_dependency(DEPENDENCY_REDIS, redis.checker());
    dispatcher.register_dependency(DEPENDENCY_CASSANDRA, ToggleChecker::healthy().checker());
    let app = Router::new().merge(dispatcher.routes()).into_axum();

    let get = |uri: &'static str| Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = app.clone().oneshot(get(INFO_URL)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    redis.set_up(false);
    let response = app.clone().oneshot(get(STATUS_URL)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/health/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(redis.calls(), 2);
}

#[tokio::test]
async fn test_cache_clients_are_interchangeable() {
    let recording = RecordingCache::new();
    let cache: Arc<dyn CacheClient> = Arc::new(recording.clone());

    cache
        .set_key("card:1", CacheValue::json(&serde_json::json!({"id": 1})).unwrap(), Some(Duration::from_secs(60)))
        .await
        .unwrap();

    assert_eq!(cache.get_key("card:1").await.unwrap(), Some(br#"{"id":1}"#.to_vec()));

    let calls = recording.set_calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].key, "card:1");
    assert_eq!(calls[0].expiration, Some(Duration::from_secs(60)));
}
