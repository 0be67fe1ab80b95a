//! The `harness` module sequences the whole exercise: provision a broker,
//! publish a batch of generated messages, then drain each configured
//! subscription in its own consumption round.
//!
//! The run controller is strictly sequential. Concurrency only exists inside
//! a round, where the subscription processor may dispatch several deliveries
//! at once.

pub mod payload;
pub mod producer;
pub mod prompt;
pub mod provision;
pub mod round;
pub mod run;

pub use payload::{LoremGenerator, PayloadGenerator};
pub use prompt::{NoopPrompt, StdinPrompt, UserPrompt};
pub use provision::{BrokerEndpoint, BrokerProvisioner, EmbeddedBroker};
pub use round::{RoundReport, run_round};
pub use run::{RunController, RunSummary};

#[cfg(test)]
mod tests;
