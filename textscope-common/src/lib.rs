//! # TextScope Common Library
//!
//! Shared code for the TextScope service and tools:
//! - Error type
//! - Configuration loading (CLI, environment, TOML, defaults)
//! - Bearer token helpers
//! - Database initialization, migrations and models

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
