//! ProfileStore trait 定义

use async_trait::async_trait;
use pantry_common::UserId;
use pantry_domain_core::UserProfile;
use pantry_errors::AppResult;

/// 用户资料存储
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn put_profile(&self, profile: &UserProfile) -> AppResult<()>;

    async fn get_profile(&self, user_id: &UserId) -> AppResult<Option<UserProfile>>;
}
