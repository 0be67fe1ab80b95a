use std::sync::Arc;

use futures::future::BoxFuture;

use crate::processor::delivery::Delivery;

/// The message extension point of a processor.
///
/// Invoked once per locked delivery; multiple invocations may be in flight
/// concurrently, each with its own [`Delivery`]. The handler is expected to
/// acknowledge the delivery before returning; one it leaves unacknowledged
/// stays locked until the broker expires the lock.
pub type MessageHandler = Arc<dyn Fn(Delivery) -> BoxFuture<'static, ()> + Send + Sync>;

/// The error extension point of a processor.
///
/// Invoked when the receive/dispatch pipeline itself faults, never for
/// application-level outcomes inside the message handler. Must not panic and
/// must be safe to call concurrently; the processor keeps running afterwards
/// until explicitly stopped.
pub type ErrorHandler = Arc<dyn Fn(PipelineFault) + Send + Sync>;

/// A fault on the receive/dispatch pipeline, as handed to the error handler.
#[derive(Debug, Clone)]
pub struct PipelineFault {
    pub description: String,
    pub kind: FaultKind,
}

/// Labels where in the pipeline a fault occurred. Purely descriptive: no
/// retry or classification behavior hangs off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Pulling a message from the subscription failed.
    Receive,
    /// A dispatched handler invocation was lost (e.g. it panicked).
    Dispatch,
}
