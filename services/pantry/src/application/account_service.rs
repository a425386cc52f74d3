//! 账号服务

use std::sync::Arc;

use pantry_common::UserId;
use pantry_domain_core::{Email, Session, UserProfile};
use pantry_errors::{AppError, AppResult};
use pantry_ports::{IdentityGateway, ProfileStore};
use tracing::{info, warn};

/// 登录、注册、登出
pub struct AccountService {
    gateway: Arc<dyn IdentityGateway>,
    profiles: Arc<dyn ProfileStore>,
}

impl AccountService {
    pub fn new(gateway: Arc<dyn IdentityGateway>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { gateway, profiles }
    }

    pub fn gateway(&self) -> &Arc<dyn IdentityGateway> {
        &self.gateway
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = Email::new(email)?;
        self.gateway.sign_in(&email, password).await
    }

    /// 注册并写入用户资料
    ///
    /// 资料写入失败时账号和会话仍然存在，返回 `StoreUnavailable`
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<Session> {
        let email = Email::new(email)?;
        let session = self.gateway.sign_up(&email, password).await?;

        let profile = UserProfile {
            user_id: session.user_id.clone(),
            display_name: display_name.trim().to_string(),
        };
        if let Err(err) = self.profiles.put_profile(&profile).await {
            warn!(user_id = %profile.user_id, error = %err, "Failed to write user profile");
            return Err(if err.is_store_unavailable() {
                err
            } else {
                AppError::store_unavailable(err.to_string())
            });
        }

        info!(user_id = %session.user_id, "User registered");
        Ok(session)
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.gateway.sign_out().await
    }

    pub async fn profile(&self, user_id: &UserId) -> AppResult<Option<UserProfile>> {
        self.profiles.get_profile(user_id).await
    }
}
