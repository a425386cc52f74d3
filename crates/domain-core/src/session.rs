//! 用户会话

use chrono::{DateTime, Utc};
use pantry_common::UserId;
use secrecy::{ExposeSecret, Secret};

use crate::Email;

/// 不透明的会话令牌，`Debug` 输出已脱敏
#[derive(Debug)]
pub struct SessionToken(Secret<String>);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    pub fn as_str(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SessionToken {
    fn clone(&self) -> Self {
        Self::new(self.as_str())
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for SessionToken {}

/// 已认证的身份上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub email: Email,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// 同一用户的同一次登录
    pub fn same_login(&self, other: &Session) -> bool {
        self.user_id == other.user_id && self.token == other.token
    }
}
