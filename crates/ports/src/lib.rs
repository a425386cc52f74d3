//! ports - 抽象 trait 层
//!
//! 定义外部协作方（文档存储、身份提供方）的抽象接口

mod identity;
mod item_store;
mod profile_store;

pub use identity::*;
pub use item_store::*;
pub use profile_store::*;
