#![allow(dead_code)]

use std::sync::Arc;

use pantry::{InventoryOptions, PantryApp};
use pantry_adapter_memory::{InMemoryIdentityGateway, InMemoryItemStore, InMemoryProfileStore};
use pantry_auth_core::TokenService;

pub const EMAIL: &str = "cook@example.com";
pub const PASSWORD: &str = "secret-pass";

pub struct Harness {
    pub gateway: Arc<InMemoryIdentityGateway>,
    pub items: Arc<InMemoryItemStore>,
    pub profiles: Arc<InMemoryProfileStore>,
}

impl Harness {
    pub fn new() -> Self {
        let tokens = TokenService::new(
            "test-secret-key-at-least-32-chars-long",
            3600,
            "pantry".to_string(),
            "pantry-app".to_string(),
        );
        Self {
            gateway: Arc::new(InMemoryIdentityGateway::new(tokens)),
            items: Arc::new(InMemoryItemStore::new()),
            profiles: Arc::new(InMemoryProfileStore::new()),
        }
    }

    pub fn app(&self, options: InventoryOptions) -> PantryApp {
        PantryApp::new(
            self.gateway.clone(),
            self.items.clone(),
            self.profiles.clone(),
            options,
        )
    }

    /// 注册并登录后的应用
    pub async fn signed_in_app(&self, options: InventoryOptions) -> PantryApp {
        let mut app = self.app(options);
        app.sign_up(EMAIL, PASSWORD, "Sam").await.unwrap();
        app
    }
}
