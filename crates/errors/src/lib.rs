//! pantry-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// 凭证无效或注册被拒绝，会话保持未设置
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// 没有有效会话
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// 存储读写失败或超时，之前的快照保持不变
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// NotFound 在本系统中是良性的
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Auth(_) => 401,
            Self::Unauthenticated(_) => 401,
            Self::StoreUnavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_type(&self) -> String {
        let slug = match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::Auth(_) => "auth",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::StoreUnavailable(_) => "store-unavailable",
            Self::Internal(_) => "internal",
        };
        format!("https://pantry.app/problems/{}", slug)
    }

    fn problem_title(&self) -> String {
        match self {
            Self::NotFound(_) => "Resource Not Found".to_string(),
            Self::Validation(_) => "Validation Error".to_string(),
            Self::Auth(_) => "Authentication Failed".to_string(),
            Self::Unauthenticated(_) => "Unauthenticated".to_string(),
            Self::StoreUnavailable(_) => "Store Unavailable".to_string(),
            Self::Internal(_) => "Internal Error".to_string(),
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_problem_details() {
        let problem = AppError::store_unavailable("list failed").to_problem_details();
        assert_eq!(problem.status, 503);
        assert_eq!(problem.title, "Store Unavailable");
        assert_eq!(problem.detail, "Store unavailable: list failed");
        assert!(problem.r#type.ends_with("/store-unavailable"));
    }

    #[test]
    fn test_problem_details_skips_missing_instance() {
        let problem = AppError::auth("wrong password").to_problem_details();
        let json = serde_json::to_value(&problem).unwrap();
        assert!(json.get("instance").is_none());
        assert_eq!(json["status"], 401);
    }

    #[test]
    fn test_not_found_is_benign_marker() {
        assert!(AppError::not_found("egg").is_not_found());
        assert!(!AppError::internal("boom").is_not_found());
    }
}
