//! BIG-IP Device-Group Inventory
//!
//! Core modules for managing an inventory of BIG-IP appliances organized
//! into device groups.

pub mod app;
pub mod errors;
pub mod filesys;
pub mod icontrol;
pub mod lifecycle;
pub mod logs;
pub mod models;
pub mod query;
pub mod reconcile;
pub mod registry;
pub mod server;
pub mod storage;
pub mod store;
pub mod utils;
