//! Device group registry

pub mod groups;
