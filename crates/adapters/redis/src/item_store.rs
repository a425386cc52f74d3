//! Redis 物品存储

use std::collections::HashMap;

use async_trait::async_trait;
use pantry_common::UserId;
use pantry_domain_core::{InventoryItem, ItemKey, ItemName, Quantity, QuantityError};
use pantry_errors::{AppError, AppResult};
use pantry_ports::ItemStore;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use tracing::{debug, warn};

use crate::RedisConfig;

/// 原子增减
///
/// 返回新数量；结果 <= 0 时删除字段并返回 0；超出 u32 范围时不写入并返回 -1
const ADJUST_SCRIPT: &str = r"
local current = tonumber(redis.call('HGET', KEYS[1], ARGV[1]) or '0')
local updated = current + tonumber(ARGV[2])
if updated > 4294967295 then
    return -1
end
if updated <= 0 then
    redis.call('HDEL', KEYS[1], ARGV[1])
    return 0
end
redis.call('HSET', KEYS[1], ARGV[1], updated)
return updated
";

/// 脚本的溢出返回值
const ADJUST_OVERFLOW: i64 = -1;

/// Redis 物品存储
pub struct RedisItemStore {
    conn: ConnectionManager,
    config: RedisConfig,
    adjust_script: Script,
}

impl RedisItemStore {
    pub fn new(conn: ConnectionManager, config: RedisConfig) -> Self {
        Self {
            conn,
            config,
            adjust_script: Script::new(ADJUST_SCRIPT),
        }
    }
}

fn unavailable(op: &str, err: redis::RedisError) -> AppError {
    AppError::store_unavailable(format!("Redis {} failed: {}", op, err))
}

#[async_trait]
impl ItemStore for RedisItemStore {
    async fn get(&self, key: &ItemKey) -> AppResult<Option<Quantity>> {
        let mut conn = self.conn.clone();
        let value: Option<i64> = conn
            .hget(self.config.items_key(&key.user_id), key.name.as_str())
            .await
            .map_err(|e| unavailable("hget", e))?;
        debug!(%key, ?value, "get");
        Ok(value.and_then(Quantity::from_stored))
    }

    async fn put(&self, key: &ItemKey, quantity: Quantity) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(
                self.config.items_key(&key.user_id),
                key.name.as_str(),
                quantity.get(),
            )
            .await
            .map_err(|e| unavailable("hset", e))?;
        Ok(())
    }

    async fn delete(&self, key: &ItemKey) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .hdel(self.config.items_key(&key.user_id), key.name.as_str())
            .await
            .map_err(|e| unavailable("hdel", e))?;
        Ok(())
    }

    async fn list_all(&self, user_id: &UserId) -> AppResult<Vec<InventoryItem>> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, i64> = conn
            .hgetall(self.config.items_key(user_id))
            .await
            .map_err(|e| unavailable("hgetall", e))?;

        let mut items: Vec<InventoryItem> = fields
            .into_iter()
            .filter_map(|(name, value)| {
                let item = ItemName::new(name.as_str())
                    .ok()
                    .zip(Quantity::from_stored(value))
                    .map(|(name, quantity)| InventoryItem::new(name, quantity));
                if item.is_none() {
                    warn!(%user_id, field = %name, value, "Skipping malformed inventory field");
                }
                item
            })
            .collect();

        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn adjust(&self, key: &ItemKey, delta: i64) -> AppResult<Option<Quantity>> {
        let mut conn = self.conn.clone();
        let result: i64 = self
            .adjust_script
            .key(self.config.items_key(&key.user_id))
            .arg(key.name.as_str())
            .arg(delta)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| unavailable("adjust", e))?;
        debug!(%key, delta, result, "adjust");
        if result == ADJUST_OVERFLOW {
            return Err(QuantityError::Overflow.into());
        }
        Ok(Quantity::from_stored(result))
    }
}
