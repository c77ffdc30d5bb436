//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on pacing, sessions and orchestration.

pub mod errors;
pub mod handle;
pub mod sink;

pub use errors::{Result, RuntimeError};
pub use handle::RunHandle;
pub use sink::{RunResultSink, TracingSink};
