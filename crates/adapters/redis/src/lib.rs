//! pantry-adapter-redis - Redis 适配器
//!
//! 每个用户的库存存放在一个 hash 中：字段为物品名称，值为数量

mod config;
mod connection;
mod item_store;
mod profile_store;

pub use config::*;
pub use connection::*;
pub use item_store::*;
pub use profile_store::*;
