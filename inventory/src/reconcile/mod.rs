//! Inventory reconciliation

pub mod engine;
