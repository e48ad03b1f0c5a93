//! Device lifecycle management

pub mod manager;
