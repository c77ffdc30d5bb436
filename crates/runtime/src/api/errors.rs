//! Unified error types surfaced by the runtime API.
//!
//! Content problems are not errors here: a plan that cannot produce an
//! encounter ends the run with [`battle_core::RunEnd::InvalidConfiguration`].
use thiserror::Error;
use tokio::sync::oneshot;

use battle_core::InvalidSpeed;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("run command channel closed")]
    CommandChannelClosed,

    #[error("run reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("run task join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("run requires a monster catalog before building")]
    MissingCatalog,

    #[error("run requires a plan before building")]
    MissingPlan,

    #[error("run requires a player before building")]
    MissingPlayer,

    #[error(transparent)]
    InvalidSpeed(#[from] InvalidSpeed),

    #[error("result sink failed: {0}")]
    Sink(String),
}
