//! Redis 配置模块

use pantry_common::UserId;

/// Redis 配置
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL
    pub url: String,
    /// 键前缀
    pub key_prefix: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
        }
    }
}

impl RedisConfig {
    /// 创建新的配置
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 设置键前缀
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// 获取带前缀的键
    pub fn prefixed_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// 用户库存 hash 的键
    pub fn items_key(&self, user_id: &UserId) -> String {
        self.prefixed_key(&format!("inventory:{}:items", user_id))
    }

    /// 用户资料 hash 的键
    pub fn profile_key(&self, user_id: &UserId) -> String {
        self.prefixed_key(&format!("users:{}", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        let config = RedisConfig::new("redis://localhost:6379").with_key_prefix("app");
        assert_eq!(config.prefixed_key("user:123"), "app:user:123");

        let config_no_prefix = RedisConfig::new("redis://localhost:6379");
        assert_eq!(config_no_prefix.prefixed_key("user:123"), "user:123");
    }

    #[test]
    fn test_partition_keys() {
        let config = RedisConfig::default().with_key_prefix("pantry");
        let user_id = UserId::new();
        assert_eq!(
            config.items_key(&user_id),
            format!("pantry:inventory:{}:items", user_id)
        );
        assert_eq!(config.profile_key(&user_id), format!("pantry:users:{}", user_id));
    }
}
