//! pantry-bootstrap - 启动骨架
//!
//! 按配置组装存储后端、身份网关与 `PantryApp`

mod infrastructure;
mod runtime;

pub use infrastructure::*;
pub use runtime::*;
