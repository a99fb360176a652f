//! Registry behaviour against the built-in providers

use reelcast_core::{BitmovinConfig, Config, ErrorKind};
use reelcast_providers::ProviderRegistry;

fn bitmovin_config(endpoint: &str) -> Config {
    Config {
        bitmovin: Some(BitmovinConfig {
            api_key: "test-key".to_string(),
            endpoint: endpoint.to_string(),
            destination: "s3://media-bucket/encodes/".to_string(),
            aws_access_key_id: "AKID".to_string(),
            aws_secret_access_key: "secret".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_defaults_register_every_backend() {
    let registry = ProviderRegistry::with_defaults();
    assert_eq!(registry.names().await, vec!["bitmovin", "mediaconvert"]);
}

#[tokio::test]
async fn test_unconfigured_providers_are_disabled() {
    let registry = ProviderRegistry::with_defaults();
    let config = Config::default();

    for name in ["bitmovin", "mediaconvert"] {
        let descriptor = registry.describe(name, &config).await.unwrap();
        assert!(!descriptor.enabled, "{} should be disabled", name);
        assert!(descriptor.capabilities.is_none());
        assert!(descriptor.health.is_none());
    }

    assert!(registry.list(&config).await.is_empty());

    let err = registry.build("mediaconvert", &config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_unknown_provider() {
    let registry = ProviderRegistry::with_defaults();
    let err = registry
        .describe("zencoder", &Config::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Registry);
}

#[tokio::test]
async fn test_healthy_bitmovin_is_listed() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/encoding/encodings")
        .match_query(mockito::Matcher::UrlEncoded("limit".into(), "1".into()))
        .match_header("X-Api-Key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":{"result":{"totalCount":0,"offset":0,"limit":1,"items":[]}}}"#)
        .expect(2)
        .create_async()
        .await;

    let registry = ProviderRegistry::with_defaults();
    let config = bitmovin_config(&server.url());

    assert_eq!(registry.list(&config).await, vec!["bitmovin"]);

    let descriptor = registry.describe("bitmovin", &config).await.unwrap();
    assert!(descriptor.enabled);
    assert_eq!(descriptor.health.map(|h| h.ok), Some(true));
    let capabilities = descriptor.capabilities.unwrap();
    assert_eq!(capabilities.destinations, vec!["s3"]);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unhealthy_bitmovin_is_enabled_but_not_listed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/encoding/encodings")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .with_body(r#"{"status":"ERROR","data":{"message":"Unauthorized"}}"#)
        .create_async()
        .await;

    let registry = ProviderRegistry::with_defaults();
    let config = bitmovin_config(&server.url());

    assert!(registry.list(&config).await.is_empty());

    let descriptor = registry.describe("bitmovin", &config).await.unwrap();
    assert!(descriptor.enabled);
    let health = descriptor.health.unwrap();
    assert!(!health.ok);
    assert!(health.message.unwrap_or_default().contains("401"));
}
