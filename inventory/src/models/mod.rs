//! Inventory data model

pub mod device;
pub mod group;
