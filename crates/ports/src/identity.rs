//! 身份网关 trait 定义

use async_trait::async_trait;
use pantry_domain_core::{Email, Session};
use pantry_errors::AppResult;
use tokio::sync::watch;

/// 身份提供方
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// 凭证无效时返回 `AppError::Auth`
    async fn sign_in(&self, email: &Email, password: &str) -> AppResult<Session>;

    /// 创建账号并登录
    async fn sign_up(&self, email: &Email, password: &str) -> AppResult<Session>;

    async fn sign_out(&self) -> AppResult<()>;

    fn current_session(&self) -> Option<Session>;

    /// 订阅会话变化
    fn subscribe(&self) -> SessionWatcher;
}

/// 会话变化订阅
///
/// 第一次 `next` 立即返回当前会话，之后每次登录、登出各返回一次。
/// 订阅方处理不及时时，连续的变化会合并为最新状态。
pub struct SessionWatcher {
    rx: watch::Receiver<Option<Session>>,
    primed: bool,
}

impl SessionWatcher {
    pub fn new(rx: watch::Receiver<Option<Session>>) -> Self {
        Self { rx, primed: false }
    }

    /// 等待下一次通知；网关被释放后返回 None
    pub async fn next(&mut self) -> Option<Option<Session>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// 不等待，读取当前会话
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pantry_domain_core::{SessionToken, UserId};

    fn session() -> Session {
        Session {
            token: SessionToken::new("t"),
            user_id: UserId::new(),
            email: Email::new("cook@example.com").unwrap(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_watcher_fires_immediately_with_current() {
        let (_tx, rx) = watch::channel(None);
        let mut watcher = SessionWatcher::new(rx);
        assert_eq!(watcher.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_watcher_fires_on_transitions() {
        let (tx, rx) = watch::channel(None);
        let mut watcher = SessionWatcher::new(rx);
        watcher.next().await;

        let s = session();
        tx.send_replace(Some(s.clone()));
        assert_eq!(watcher.next().await, Some(Some(s)));

        tx.send_replace(None);
        assert_eq!(watcher.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_watcher_ends_when_gateway_dropped() {
        let (tx, rx) = watch::channel(None);
        let mut watcher = SessionWatcher::new(rx);
        watcher.next().await;
        drop(tx);
        assert_eq!(watcher.next().await, None);
    }
}
