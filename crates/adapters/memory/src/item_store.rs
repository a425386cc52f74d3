//! 内存物品存储

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use pantry_common::UserId;
use pantry_domain_core::{InventoryItem, ItemKey, ItemName, Quantity, QuantityError};
use pantry_errors::AppResult;
use pantry_ports::ItemStore;
use parking_lot::RwLock;
use tracing::debug;

use crate::FaultInjector;

type Partition = BTreeMap<ItemName, Quantity>;

/// 内存物品存储
///
/// 每个用户一个按名称排序的分区
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    partitions: RwLock<HashMap<UserId, Partition>>,
    faults: FaultInjector,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    /// 绕过故障注入直接读取，测试断言用
    pub fn peek(&self, key: &ItemKey) -> Option<Quantity> {
        self.partitions
            .read()
            .get(&key.user_id)
            .and_then(|p| p.get(&key.name).copied())
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn get(&self, key: &ItemKey) -> AppResult<Option<Quantity>> {
        self.faults.enter("get").await?;
        debug!(%key, "get");
        Ok(self.peek(key))
    }

    async fn put(&self, key: &ItemKey, quantity: Quantity) -> AppResult<()> {
        self.faults.enter("put").await?;
        debug!(%key, %quantity, "put");
        self.partitions
            .write()
            .entry(key.user_id.clone())
            .or_default()
            .insert(key.name.clone(), quantity);
        Ok(())
    }

    async fn delete(&self, key: &ItemKey) -> AppResult<()> {
        self.faults.enter("delete").await?;
        debug!(%key, "delete");
        let mut partitions = self.partitions.write();
        if let Some(partition) = partitions.get_mut(&key.user_id) {
            partition.remove(&key.name);
        }
        Ok(())
    }

    async fn list_all(&self, user_id: &UserId) -> AppResult<Vec<InventoryItem>> {
        self.faults.enter("list_all").await?;
        let partitions = self.partitions.read();
        Ok(partitions
            .get(user_id)
            .map(|p| {
                p.iter()
                    .map(|(name, quantity)| InventoryItem::new(name.clone(), *quantity))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn adjust(&self, key: &ItemKey, delta: i64) -> AppResult<Option<Quantity>> {
        self.faults.enter("adjust").await?;
        debug!(%key, delta, "adjust");

        let mut partitions = self.partitions.write();
        let partition = partitions.entry(key.user_id.clone()).or_default();
        let current = partition.get(&key.name).map_or(0, |q| i64::from(q.get()));
        let next = current
            .checked_add(delta)
            .ok_or(QuantityError::Overflow)?;

        if next <= 0 {
            partition.remove(&key.name);
            return Ok(None);
        }

        let next = u32::try_from(next)
            .ok()
            .and_then(|v| Quantity::new(v).ok())
            .ok_or(QuantityError::Overflow)?;
        partition.insert(key.name.clone(), next);
        Ok(Some(next))
    }
}
