//! Per-tick failure taxonomy
//!
//! None of these are fatal: a failed tick is logged and the task resumes at
//! its next scheduled interval. Only an unrecoverable startup failure
//! (inability to construct the sink or source) terminates the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TickError {
    /// A batch submission failed or was rejected wholesale. The tick's data
    /// is lost; there is no retry queue.
    #[error("sink rejected batch for table {table}: {reason}")]
    SinkUnavailable { table: String, reason: anyhow::Error },

    /// The known-vehicle snapshot could not be fetched. The caller
    /// substitutes synthesized placeholder vehicles for this tick only.
    #[error("vehicle source unavailable: {0}")]
    SourceUnavailable(anyhow::Error),

    /// Unexpected failure while constructing a batch; the tick is skipped.
    #[error("failed to build batch: {0}")]
    Generation(anyhow::Error),
}
