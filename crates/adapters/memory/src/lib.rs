//! pantry-adapter-memory - 进程内适配器
//!
//! 开发环境和测试使用的文档存储与身份网关实现

mod fault;
mod identity;
mod item_store;
mod profile_store;

pub use fault::*;
pub use identity::*;
pub use item_store::*;
pub use profile_store::*;
