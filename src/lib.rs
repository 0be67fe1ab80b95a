//! # subdrain
//!
//! `subdrain` is a small harness that exercises a message broker's
//! topic/subscription fan-out under peek-lock delivery. It publishes a batch
//! of generated text messages to a topic, then attaches to each configured
//! durable subscription in turn, drains messages with explicit
//! acknowledgment for a bounded window, and reports what was received.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `broker`: An in-memory topic broker with peek-lock semantics that backs the run.
//! - `client`: The producer-side connection and message sink.
//! - `processor`: The subscription processor lifecycle and its delivery-acknowledgment protocol.
//! - `harness`: Provisioning, the producer loop, consumption rounds, and the run controller.
//! - `config`: Handles loading and managing the harness configuration.
//! - `utils`: Shared utilities, such as error handling and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod harness;
pub mod processor;
pub mod utils;
