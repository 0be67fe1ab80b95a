//! The `error` module defines the error taxonomy of the harness.
//!
//! Fatal conditions (provisioning, publishing, lifecycle misuse) surface as
//! `HarnessError` and propagate up to the run controller, which terminates the
//! run. Faults on the receive/dispatch path of a running processor are *not*
//! represented here: they are routed to the processor's error handler as a
//! [`PipelineFault`](crate::processor::handlers::PipelineFault) and never
//! abort a round.

use thiserror::Error;

use crate::processor::ProcessorState;

/// Errors that terminate the run when they propagate to the controller.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The broker instance could not be provisioned or its configuration
    /// artifact could not be read.
    #[error("broker provisioning failed: {0}")]
    Provisioning(String),

    /// A send on the publish path was rejected by the broker.
    #[error("publish to topic '{topic}' failed: {reason}")]
    Publish { topic: String, reason: String },

    /// A processor lifecycle operation was invoked out of order. This is a
    /// programming error in the orchestration layer, not a runtime condition.
    #[error("'{operation}' is not valid while the processor is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: ProcessorState,
    },

    /// Configuration could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
