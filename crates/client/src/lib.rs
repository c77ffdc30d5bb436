//! Headless auto-battle client.
//!
//! Loads battle content from a data directory, starts one run and narrates
//! it through `tracing`. Hosts with their own UI embed `battle-runtime`
//! directly; this crate is the reference composition.
pub mod app;
pub mod config;

pub use config::ClientConfig;
