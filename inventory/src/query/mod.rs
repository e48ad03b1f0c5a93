//! Read-only query surface

pub mod facade;
