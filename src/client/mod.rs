//! The `client` module holds the producer-side surface of the harness.
//!
//! A [`Connection`] is a handle to a provisioned broker; a [`MessageSink`]
//! binds a connection to one topic and exposes the send operation the
//! producer loop drives. Each component opens its own connection and never
//! shares it.

pub mod connection;
pub mod sink;

pub use connection::Connection;
pub use sink::MessageSink;
