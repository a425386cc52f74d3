//! ItemStore trait 定义

use async_trait::async_trait;
use pantry_common::UserId;
use pantry_domain_core::{InventoryItem, ItemKey, Quantity};
use pantry_errors::AppResult;

/// 按用户分区的物品文档存储
///
/// 存储中的数量始终 >= 1
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// 读取单个文档，不存在返回 None
    async fn get(&self, key: &ItemKey) -> AppResult<Option<Quantity>>;

    /// 写入（覆盖）文档
    async fn put(&self, key: &ItemKey, quantity: Quantity) -> AppResult<()>;

    /// 删除文档，不存在时不报错
    async fn delete(&self, key: &ItemKey) -> AppResult<()>;

    /// 列出用户分区下的全部文档，按名称排序
    async fn list_all(&self, user_id: &UserId) -> AppResult<Vec<InventoryItem>>;

    /// 原子增减
    ///
    /// 结果 <= 0 时删除文档并返回 None；文档不存在且 delta <= 0 时不做任何事
    async fn adjust(&self, key: &ItemKey, delta: i64) -> AppResult<Option<Quantity>>;
}
