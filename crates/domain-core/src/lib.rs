//! domain-core - 库存领域核心类型

mod email;
mod item;
mod quantity;
mod session;

pub use email::*;
pub use item::*;
pub use quantity::*;
pub use session::*;

// Re-export common types
pub use pantry_common::UserId;
