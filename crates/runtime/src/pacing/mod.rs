//! Pacing between ticks: cancellation, pause/resume and speed control.

mod cancel;
pub(crate) mod pacer;

pub use cancel::CancelToken;
pub(crate) use pacer::{Control, Pacer, WaitOutcome};
