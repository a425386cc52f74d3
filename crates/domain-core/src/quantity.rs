//! 数量值对象

use std::fmt;

use pantry_errors::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 物品数量
///
/// 始终 >= 1；归零的物品会被删除而不是以 0 持久化
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Quantity must be at least 1")]
    Zero,
    #[error("Quantity overflow")]
    Overflow,
}

impl From<QuantityError> for AppError {
    fn from(err: QuantityError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(value))
    }

    /// 从存储中的有符号值转换，<= 0 视为不存在
    pub fn from_stored(value: i64) -> Option<Self> {
        u32::try_from(value).ok().and_then(|v| Self::new(v).ok())
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// 加一
    pub fn increment(self) -> Result<Self, QuantityError> {
        self.0.checked_add(1).map(Self).ok_or(QuantityError::Overflow)
    }

    /// 减一，归零时返回 None
    pub fn decrement(self) -> Option<Self> {
        Self::new(self.0 - 1).ok()
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
