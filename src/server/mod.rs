//! Server module for TOPLUS
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `providers`: Provider resolution and registration
//! - `init`: Service construction and the HTTP run loop

pub mod config;
mod init;
mod loader;
mod providers;

pub use init::{build_service, run};
pub use loader::load_config;
pub use providers::resolve_providers;
