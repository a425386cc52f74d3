use crate::{AppConfig, StoreBackend, StoreConfig};
use figment::Jail;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

#[test]
fn test_secret_redaction() {
    let store = StoreConfig {
        url: Some(Secret::new("redis://:hunter2@localhost:6379".to_string())),
        ..StoreConfig::default()
    };
    let debug_output = format!("{:?}", store);
    assert!(!debug_output.contains("hunter2"));
    assert!(debug_output.contains("REDACTED"));
}

#[test]
fn test_store_defaults() {
    let store = StoreConfig::default();
    assert_eq!(store.backend, StoreBackend::Memory);
    assert_eq!(store.key_prefix, "pantry");
    assert_eq!(store.request_timeout(), Duration::from_secs(10));
    assert!(!store.atomic_updates);
}

#[test]
fn test_load_layers_files_and_env() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "default.toml",
            r#"
            app_name = "pantry"
            app_env = "development"

            [identity]
            token_secret = "dev-secret-dev-secret-dev-secret"
            "#,
        )?;
        jail.create_file(
            "staging.toml",
            r#"
            app_env = "staging"

            [store]
            backend = "redis"
            url = "redis://localhost:6379"
            request_timeout_ms = 2500
            "#,
        )?;
        jail.set_env("APP_ENV", "staging");
        jail.set_env("PANTRY_STORE__ATOMIC_UPDATES", "true");
        jail.set_env("PANTRY_TELEMETRY__LOG_LEVEL", "debug");

        let config = AppConfig::load(".").expect("config should load");
        assert_eq!(config.app_env, "staging");
        assert!(!config.is_production());
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(
            config.store.url.as_ref().map(|u| u.expose_secret().as_str()),
            Some("redis://localhost:6379")
        );
        assert_eq!(config.store.request_timeout(), Duration::from_millis(2500));
        assert!(config.store.atomic_updates);
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.identity.session_ttl_secs, 3600);
        assert_eq!(config.identity.issuer, "pantry");
        Ok(())
    });
}

#[test]
fn test_load_fails_without_identity_section() {
    Jail::expect_with(|jail| {
        jail.create_file("default.toml", "app_name = \"pantry\"\napp_env = \"development\"\n")?;
        assert!(AppConfig::load(".").is_err());
        Ok(())
    });
}
