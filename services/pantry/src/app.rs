//! 会话生命周期
//!
//! 订阅身份网关的会话变化：登录时创建 `InventoryContext` 并加载快照，登出时销毁

use std::sync::Arc;

use metrics::counter;
use pantry_domain_core::{InventoryItem, Session, Snapshot, UserProfile};
use pantry_errors::{AppError, AppResult};
use pantry_ports::{IdentityGateway, ItemStore, ProfileStore, SessionWatcher};
use pantry_telemetry::METRIC_SESSION_TRANSITIONS;
use tracing::{info, warn};

use crate::application::{AccountService, InventoryContext, InventoryOptions, InventoryService, search};

/// 展示层调用的入口
pub struct PantryApp {
    accounts: AccountService,
    inventory: InventoryService,
    watcher: SessionWatcher,
    context: Option<InventoryContext>,
}

fn no_session() -> AppError {
    AppError::unauthenticated("No active session")
}

impl PantryApp {
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        items: Arc<dyn ItemStore>,
        profiles: Arc<dyn ProfileStore>,
        options: InventoryOptions,
    ) -> Self {
        let watcher = gateway.subscribe();
        Self {
            accounts: AccountService::new(gateway, profiles),
            inventory: InventoryService::new(items, options),
            watcher,
            context: None,
        }
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    /// 等待下一次会话通知并应用
    ///
    /// 第一次调用立即返回当前会话；网关关闭后返回 `Ok(false)`
    pub async fn sync(&mut self) -> AppResult<bool> {
        match self.watcher.next().await {
            Some(session) => {
                self.apply_session(session).await?;
                Ok(true)
            }
            None => {
                warn!("Identity gateway closed the session stream");
                self.apply_session(None).await?;
                Ok(false)
            }
        }
    }

    /// 应用一次会话变化
    ///
    /// 快照加载失败时上下文仍然建立（空快照），错误返回给调用方
    pub async fn apply_session(&mut self, session: Option<Session>) -> AppResult<()> {
        match session {
            Some(session) => {
                if let Some(ctx) = &self.context {
                    if ctx.session().same_login(&session) {
                        return Ok(());
                    }
                }

                counter!(METRIC_SESSION_TRANSITIONS, "transition" => "sign_in").increment(1);
                info!(user_id = %session.user_id, "Session opened");

                let ctx = self.context.insert(InventoryContext::new(session));
                self.inventory.load_snapshot(ctx).await?;
                Ok(())
            }
            None => {
                if let Some(ctx) = self.context.take() {
                    counter!(METRIC_SESSION_TRANSITIONS, "transition" => "sign_out").increment(1);
                    info!(user_id = %ctx.user_id(), "Session closed, snapshot cleared");
                }
                Ok(())
            }
        }
    }

    /// 直接应用网关当前的会话，不等待通知
    ///
    /// 与稍后到达的同一通知重复时，`apply_session` 不会重复加载
    pub async fn apply_current(&mut self) -> AppResult<()> {
        let current = self.accounts.gateway().current_session();
        self.apply_session(current).await
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> AppResult<&Snapshot> {
        self.accounts.sign_in(email, password).await?;
        self.apply_current().await?;
        self.snapshot()
    }

    /// 注册；资料写入失败时会话仍会建立，错误照常返回
    ///
    /// 注册被拒（`Auth`）时直接返回，不应用会话变化
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AppResult<&Snapshot> {
        let registered = self.accounts.sign_up(email, password, display_name).await;
        if let Err(err @ AppError::Auth(_)) = registered {
            return Err(err);
        }
        self.apply_current().await?;
        registered?;
        self.snapshot()
    }

    pub async fn sign_out(&mut self) -> AppResult<()> {
        self.accounts.sign_out().await?;
        self.apply_current().await
    }

    pub fn is_signed_in(&self) -> bool {
        self.context.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.context.as_ref().map(InventoryContext::session)
    }

    pub async fn profile(&self) -> AppResult<Option<UserProfile>> {
        let ctx = self.context.as_ref().ok_or_else(no_session)?;
        self.accounts.profile(ctx.user_id()).await
    }

    pub fn snapshot(&self) -> AppResult<&Snapshot> {
        self.context
            .as_ref()
            .map(InventoryContext::snapshot)
            .ok_or_else(no_session)
    }

    pub async fn refresh(&mut self) -> AppResult<&Snapshot> {
        let ctx = self.context.as_mut().ok_or_else(no_session)?;
        self.inventory.load_snapshot(ctx).await
    }

    pub async fn add_item(&mut self, name: &str) -> AppResult<&Snapshot> {
        let ctx = self.context.as_mut().ok_or_else(no_session)?;
        self.inventory.add_item(ctx, name).await
    }

    pub async fn remove_item(&mut self, name: &str) -> AppResult<&Snapshot> {
        let ctx = self.context.as_mut().ok_or_else(no_session)?;
        self.inventory.remove_item(ctx, name).await
    }

    pub fn search(&self, query: &str) -> AppResult<Vec<InventoryItem>> {
        Ok(search(self.snapshot()?, query))
    }
}
