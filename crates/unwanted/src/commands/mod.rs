//! Command implementations

pub mod check;
pub mod common;
pub mod policy;
pub mod version;
