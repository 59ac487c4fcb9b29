//! CLI command implementations.

pub mod delete;
pub mod import;
pub mod info;
pub mod list;
pub mod models;
pub mod show;
