//! 库存物品

use std::fmt;

use pantry_common::UserId;
use pantry_errors::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Quantity;

/// 文档 ID 的最大字节数
pub const MAX_ITEM_NAME_BYTES: usize = 1500;

/// 物品名称
///
/// 按存储时的大小写区分；搜索时不区分大小写
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemNameError {
    #[error("Item name must not be empty")]
    Empty,
    #[error("Item name must not contain '/'")]
    ContainsSeparator,
    #[error("Item name exceeds {MAX_ITEM_NAME_BYTES} bytes")]
    TooLong,
}

impl From<ItemNameError> for AppError {
    fn from(err: ItemNameError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl ItemName {
    pub fn new(name: impl Into<String>) -> Result<Self, ItemNameError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ItemNameError::Empty);
        }
        if name.contains('/') {
            return Err(ItemNameError::ContainsSeparator);
        }
        if name.len() > MAX_ITEM_NAME_BYTES {
            return Err(ItemNameError::TooLong);
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 大小写不敏感的子串匹配，`query_lower` 需已转为小写
    pub fn contains_lowercase(&self, query_lower: &str) -> bool {
        self.0.to_lowercase().contains(query_lower)
    }
}

impl TryFrom<String> for ItemName {
    type Error = ItemNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 文档键：(用户, 物品名称)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub user_id: UserId,
    pub name: ItemName,
}

impl ItemKey {
    pub fn new(user_id: UserId, name: ItemName) -> Self {
        Self { user_id, name }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inventory/{}/items/{}", self.user_id, self.name)
    }
}

/// 库存物品
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: ItemName,
    pub quantity: Quantity,
}

impl InventoryItem {
    pub fn new(name: ItemName, quantity: Quantity) -> Self {
        Self { name, quantity }
    }
}

/// 用户库存的完整快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    items: Vec<InventoryItem>,
}

impl Snapshot {
    /// 按名称排序后建立快照
    pub fn new(mut items: Vec<InventoryItem>) -> Self {
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get(&self, name: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.name.as_str() == name)
    }

    pub fn quantity_of(&self, name: &str) -> Option<u32> {
        self.get(name).map(|item| item.quantity.get())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 用户资料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: String,
}
