//! 内存身份网关
//!
//! 账号密码使用 Argon2 哈希，会话令牌由 `TokenService` 签发

use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use pantry_auth_core::TokenService;
use pantry_common::UserId;
use pantry_domain_core::{Email, Session, SessionToken};
use pantry_errors::{AppError, AppResult};
use pantry_ports::{IdentityGateway, SessionWatcher};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{info, warn};

/// 密码最小长度
pub const MIN_PASSWORD_LENGTH: usize = 6;

struct Account {
    user_id: UserId,
    password_hash: String,
}

/// 内存身份网关
pub struct InMemoryIdentityGateway {
    accounts: Mutex<HashMap<Email, Account>>,
    tokens: TokenService,
    current: watch::Sender<Option<Session>>,
}

impl InMemoryIdentityGateway {
    pub fn new(tokens: TokenService) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            tokens,
            current,
        }
    }

    /// 校验令牌，返回对应的会话
    pub fn validate(&self, token: &SessionToken) -> AppResult<Session> {
        let claims = self.tokens.validate(token.as_str())?;
        Ok(Session {
            token: token.clone(),
            user_id: claims.user_id()?,
            email: Email::new(claims.email.as_str())
                .map_err(|e| AppError::unauthenticated(e.to_string()))?,
            expires_at: claims.expires_at()?,
        })
    }

    fn open_session(&self, user_id: &UserId, email: &Email) -> AppResult<Session> {
        let issued = self.tokens.issue(user_id, email.as_str())?;
        let session = Session {
            token: SessionToken::new(issued.token),
            user_id: user_id.clone(),
            email: email.clone(),
            expires_at: issued.claims.expires_at()?,
        };
        self.current.send_replace(Some(session.clone()));
        Ok(session)
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| AppError::internal(format!("Invalid hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[async_trait]
impl IdentityGateway for InMemoryIdentityGateway {
    async fn sign_in(&self, email: &Email, password: &str) -> AppResult<Session> {
        let user_id = {
            let accounts = self.accounts.lock();
            match accounts.get(email) {
                Some(account) if verify_password(password, &account.password_hash)? => {
                    account.user_id.clone()
                }
                _ => {
                    warn!(%email, "Sign-in rejected");
                    return Err(AppError::auth("Invalid email or password"));
                }
            }
        };

        info!(%email, %user_id, "Signed in");
        self.open_session(&user_id, email)
    }

    async fn sign_up(&self, email: &Email, password: &str) -> AppResult<Session> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::auth(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let password_hash = hash_password(password)?;
        let user_id = {
            let mut accounts = self.accounts.lock();
            if accounts.contains_key(email) {
                return Err(AppError::auth("Email already in use"));
            }
            let user_id = UserId::new();
            accounts.insert(
                email.clone(),
                Account {
                    user_id: user_id.clone(),
                    password_hash,
                },
            );
            user_id
        };

        info!(%email, %user_id, "Account created");
        self.open_session(&user_id, email)
    }

    async fn sign_out(&self) -> AppResult<()> {
        if let Some(session) = self.current.send_replace(None) {
            info!(user_id = %session.user_id, "Signed out");
        }
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> SessionWatcher {
        SessionWatcher::new(self.current.subscribe())
    }
}
