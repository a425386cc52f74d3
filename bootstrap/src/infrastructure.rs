//! 基础设施资源管理
//!
//! 根据配置选择存储后端并创建身份网关

use std::sync::Arc;

use pantry::{InventoryOptions, PantryApp};
use pantry_adapter_memory::{InMemoryIdentityGateway, InMemoryItemStore, InMemoryProfileStore};
use pantry_adapter_redis::{
    RedisConfig, RedisItemStore, RedisProfileStore, check_connection, create_connection_manager,
};
use pantry_auth_core::TokenService;
use pantry_config::{AppConfig, StoreBackend};
use pantry_errors::{AppError, AppResult};
use pantry_ports::{IdentityGateway, ItemStore, ProfileStore};
use secrecy::ExposeSecret;
use tracing::info;

/// 基础设施资源容器
pub struct Infrastructure {
    config: AppConfig,
    items: Arc<dyn ItemStore>,
    profiles: Arc<dyn ProfileStore>,
    gateway: Arc<dyn IdentityGateway>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let identity = &config.identity;
        let tokens = TokenService::new(
            identity.token_secret.expose_secret(),
            i64::try_from(identity.session_ttl_secs).unwrap_or(i64::MAX),
            identity.issuer.clone(),
            identity.audience.clone(),
        );
        let gateway: Arc<dyn IdentityGateway> = Arc::new(InMemoryIdentityGateway::new(tokens));

        let (items, profiles): (Arc<dyn ItemStore>, Arc<dyn ProfileStore>) =
            match config.store.backend {
                StoreBackend::Memory => {
                    info!("Using in-memory item store");
                    (
                        Arc::new(InMemoryItemStore::new()),
                        Arc::new(InMemoryProfileStore::new()),
                    )
                }
                StoreBackend::Redis => {
                    let url = config.store.url.as_ref().ok_or_else(|| {
                        AppError::validation("store.url is required for the redis backend")
                    })?;
                    let redis_config = RedisConfig::new(url.expose_secret().as_str())
                        .with_key_prefix(config.store.key_prefix.as_str());

                    let mut conn = tokio::time::timeout(
                        config.store.request_timeout(),
                        create_connection_manager(&redis_config.url),
                    )
                    .await
                    .map_err(|_| AppError::store_unavailable("Redis connection timed out"))??;
                    check_connection(&mut conn).await?;
                    info!(key_prefix = %config.store.key_prefix, "Redis item store connected");

                    (
                        Arc::new(RedisItemStore::new(conn.clone(), redis_config.clone())),
                        Arc::new(RedisProfileStore::new(conn, redis_config)),
                    )
                }
            };

        Ok(Self {
            config,
            items,
            profiles,
            gateway,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn item_store(&self) -> Arc<dyn ItemStore> {
        self.items.clone()
    }

    pub fn profile_store(&self) -> Arc<dyn ProfileStore> {
        self.profiles.clone()
    }

    pub fn identity_gateway(&self) -> Arc<dyn IdentityGateway> {
        self.gateway.clone()
    }

    /// 组装应用入口
    pub fn into_app(self) -> PantryApp {
        let options = InventoryOptions::from(&self.config.store);
        PantryApp::new(self.gateway, self.items, self.profiles, options)
    }
}
