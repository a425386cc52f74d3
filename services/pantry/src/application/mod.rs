//! 应用层

mod account_service;
mod inventory_service;
mod search;

pub use account_service::*;
pub use inventory_service::*;
pub use search::*;
