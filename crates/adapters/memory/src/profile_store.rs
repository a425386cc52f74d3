//! 内存用户资料存储

use std::collections::HashMap;

use async_trait::async_trait;
use pantry_common::UserId;
use pantry_domain_core::UserProfile;
use pantry_errors::AppResult;
use pantry_ports::ProfileStore;
use parking_lot::RwLock;

use crate::FaultInjector;

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
    faults: FaultInjector,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn put_profile(&self, profile: &UserProfile) -> AppResult<()> {
        self.faults.enter("put_profile").await?;
        self.profiles
            .write()
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn get_profile(&self, user_id: &UserId) -> AppResult<Option<UserProfile>> {
        self.faults.enter("get_profile").await?;
        Ok(self.profiles.read().get(user_id).cloned())
    }
}
