//! 运行时初始化

use pantry_config::AppConfig;
use pantry_errors::{AppError, AppResult};
use pantry_telemetry::{PrometheusHandle, init_metrics, init_tracing, init_tracing_json};
use tracing::info;

/// 初始化运行时
///
/// 安装 tracing 与 Prometheus recorder，返回用于导出指标的句柄
pub fn init_runtime(config: &AppConfig) -> AppResult<PrometheusHandle> {
    // 初始化 tracing
    if config.is_production() {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    let metrics = init_metrics()
        .map_err(|e| AppError::internal(format!("Failed to install metrics recorder: {}", e)))?;

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        store_backend = ?config.store.backend,
        "Runtime initialized"
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_config::{IdentityConfig, StoreConfig, TelemetryConfig};
    use pantry_telemetry::METRIC_SESSION_TRANSITIONS;
    use secrecy::Secret;

    #[test]
    fn test_init_runtime_installs_metrics_recorder() {
        let config = AppConfig {
            app_name: "pantry".to_string(),
            app_env: "test".to_string(),
            telemetry: TelemetryConfig::default(),
            store: StoreConfig::default(),
            identity: IdentityConfig {
                token_secret: Secret::new("test-secret-key-at-least-32-chars-long".to_string()),
                session_ttl_secs: 600,
                issuer: "pantry".to_string(),
                audience: "pantry-app".to_string(),
            },
        };

        let handle = init_runtime(&config).unwrap();
        metrics::counter!(METRIC_SESSION_TRANSITIONS, "transition" => "sign_in").increment(1);
        assert!(handle.render().contains(METRIC_SESSION_TRANSITIONS));
    }
}
