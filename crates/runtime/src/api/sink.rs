//! Delivery of terminal run results to the reward collaborator.
use async_trait::async_trait;
use battle_core::RunResult;

use super::errors::{Result, RuntimeError};

/// Receives the result of every finished run.
///
/// Implementations grant experience, gold and items, or persist progression.
/// The engine itself never mutates currency; a failing sink is logged and
/// does not change the run's outcome.
#[async_trait]
pub trait RunResultSink: Send + Sync {
    async fn deliver(&self, result: &RunResult) -> Result<()>;
}

/// Sink that logs each result as a JSON document.
pub struct TracingSink;

#[async_trait]
impl RunResultSink for TracingSink {
    async fn deliver(&self, result: &RunResult) -> Result<()> {
        let json = serde_json::to_string(result).map_err(|e| RuntimeError::Sink(e.to_string()))?;
        tracing::info!(target: "battle::result", plan = %result.plan, success = result.success, %json, "Run result");
        Ok(())
    }
}
