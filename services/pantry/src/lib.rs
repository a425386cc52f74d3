//! Pantry - 家庭库存服务
//!
//! 身份网关发出会话事件后加载用户库存快照，每次增减后重新拉取完整快照

pub mod application;
pub mod app;

pub use app::PantryApp;
pub use application::{
    AccountService, InventoryContext, InventoryOptions, InventoryService, search,
};
