//! TOPLUS - staged text revision
//!
//! HTTP API and server wiring over `toplus-core`.

#![forbid(unsafe_code)]

pub mod api;
pub mod server;
