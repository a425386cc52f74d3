//! Redis 用户资料存储

use async_trait::async_trait;
use pantry_common::UserId;
use pantry_domain_core::UserProfile;
use pantry_errors::{AppError, AppResult};
use pantry_ports::ProfileStore;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::RedisConfig;

const DISPLAY_NAME_FIELD: &str = "name";

pub struct RedisProfileStore {
    conn: ConnectionManager,
    config: RedisConfig,
}

impl RedisProfileStore {
    pub fn new(conn: ConnectionManager, config: RedisConfig) -> Self {
        Self { conn, config }
    }
}

#[async_trait]
impl ProfileStore for RedisProfileStore {
    async fn put_profile(&self, profile: &UserProfile) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(
                self.config.profile_key(&profile.user_id),
                DISPLAY_NAME_FIELD,
                profile.display_name.as_str(),
            )
            .await
            .map_err(|e| AppError::store_unavailable(format!("Redis hset failed: {}", e)))?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &UserId) -> AppResult<Option<UserProfile>> {
        let mut conn = self.conn.clone();
        let name: Option<String> = conn
            .hget(self.config.profile_key(user_id), DISPLAY_NAME_FIELD)
            .await
            .map_err(|e| AppError::store_unavailable(format!("Redis hget failed: {}", e)))?;
        Ok(name.map(|display_name| UserProfile {
            user_id: user_id.clone(),
            display_name,
        }))
    }
}
