//! telemetry - 可观测性库

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use metrics_exporter_prometheus::{BuildError, PrometheusHandle};

/// 库存变更计数（标签：op）
pub const METRIC_ITEM_MUTATIONS: &str = "pantry_item_mutations_total";
/// 存储调用失败计数（标签：op）
pub const METRIC_STORE_FAILURES: &str = "pantry_store_failures_total";
/// 快照加载耗时（秒）
pub const METRIC_SNAPSHOT_LOAD_SECONDS: &str = "pantry_snapshot_load_seconds";
/// 会话切换计数（标签：transition）
pub const METRIC_SESSION_TRANSITIONS: &str = "pantry_session_transitions_total";

/// 初始化 tracing
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// 初始化 Prometheus metrics
///
/// 进程内只能安装一次
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

/// 注册指标描述
pub fn describe_metrics() {
    describe_counter!(METRIC_ITEM_MUTATIONS, "Inventory mutations applied to the item store");
    describe_counter!(METRIC_STORE_FAILURES, "Item store calls that failed or timed out");
    describe_histogram!(METRIC_SNAPSHOT_LOAD_SECONDS, "Time spent loading a full snapshot");
    describe_counter!(METRIC_SESSION_TRANSITIONS, "Sign-in and sign-out transitions observed");
}
