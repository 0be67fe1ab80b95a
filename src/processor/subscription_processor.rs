use std::time::Duration;

use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::error;

use crate::client::Connection;
use crate::processor::delivery::Delivery;
use crate::processor::handlers::{ErrorHandler, FaultKind, MessageHandler, PipelineFault};
use crate::processor::{DeliveryMode, SubscriptionTarget};
use crate::utils::HarnessError;

/// How long the pump waits before asking the subscription again when nothing
/// was pending or a receive faulted.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Lifecycle states of a [`SubscriptionProcessor`].
///
/// The only valid walk is `Idle` → `Armed` → `Running` → `Draining` →
/// `Stopped` → `Released`; any operation invoked outside its slot fails with
/// an invalid-state error and changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Created; handlers not yet attached.
    Idle,
    /// Handlers attached; not yet pulling messages.
    Armed,
    /// Actively pulling locked messages and dispatching them.
    Running,
    /// Stop requested; in-flight handler invocations finishing.
    Draining,
    /// No further deliveries will be dispatched.
    Stopped,
    /// Connection released; the handle is dead.
    Released,
}

/// The active consumer attached to one subscription.
///
/// Owns its connection, the (topic, subscription) target, and the two
/// attached handlers. While running, a pump task pulls locked messages and
/// dispatches each to the message handler as its own task, so several
/// handler invocations may be in flight at once. Receive and dispatch faults
/// go to the error handler; the pump keeps running until [`stop`] is called.
///
/// [`stop`]: SubscriptionProcessor::stop
pub struct SubscriptionProcessor {
    connection: Option<Connection>,
    target: SubscriptionTarget,
    mode: DeliveryMode,
    handlers: Option<(MessageHandler, ErrorHandler)>,
    state: ProcessorState,
    pump: Option<Pump>,
}

struct Pump {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SubscriptionProcessor {
    /// Creates an idle processor for one subscription target.
    pub fn new(connection: Connection, target: SubscriptionTarget, mode: DeliveryMode) -> Self {
        Self {
            connection: Some(connection),
            target,
            mode,
            handlers: None,
            state: ProcessorState::Idle,
            pump: None,
        }
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn target(&self) -> &SubscriptionTarget {
        &self.target
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Attaches the message and error handlers. Valid only while `Idle`.
    pub fn attach(
        &mut self,
        on_message: MessageHandler,
        on_error: ErrorHandler,
    ) -> Result<(), HarnessError> {
        if self.state != ProcessorState::Idle {
            return Err(self.invalid("attach"));
        }
        self.handlers = Some((on_message, on_error));
        self.state = ProcessorState::Armed;
        Ok(())
    }

    /// Begins pulling locked messages from the target subscription. Valid
    /// only while `Armed`; returns with the processor `Running` and the pump
    /// task spawned.
    pub fn start(&mut self) -> Result<(), HarnessError> {
        if self.state != ProcessorState::Armed {
            return Err(self.invalid("start"));
        }
        // Armed implies both slots are populated.
        let (on_message, on_error) = self
            .handlers
            .as_ref()
            .map(|(m, e)| (m.clone(), e.clone()))
            .ok_or_else(|| self.invalid("start"))?;
        let connection = self
            .connection
            .clone()
            .ok_or_else(|| self.invalid("start"))?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(pump(
            connection,
            self.target.clone(),
            on_message,
            on_error,
            stop_rx,
        ));
        self.pump = Some(Pump { stop_tx, task });
        self.state = ProcessorState::Running;
        Ok(())
    }

    /// Signals the pump to stop and waits for the drain to finish: no new
    /// deliveries are dispatched and every in-flight handler invocation has
    /// returned by the time this resolves. Valid from `Running` or
    /// `Draining`; calling before `start` is a usage error.
    pub async fn stop(&mut self) -> Result<(), HarnessError> {
        match self.state {
            ProcessorState::Running | ProcessorState::Draining => {}
            _ => return Err(self.invalid("stop")),
        }
        self.state = ProcessorState::Draining;
        if let Some(pump) = self.pump.take() {
            let _ = pump.stop_tx.send(true);
            if let Err(e) = pump.task.await {
                error!("Processor pump for '{}' failed: {}", self.target.subscription, e);
            }
        }
        self.state = ProcessorState::Stopped;
        Ok(())
    }

    /// Releases the underlying connection. Valid only from `Stopped`; the
    /// handle is dead afterwards.
    pub fn release(&mut self) -> Result<(), HarnessError> {
        if self.state != ProcessorState::Stopped {
            return Err(self.invalid("release"));
        }
        self.connection = None;
        self.handlers = None;
        self.state = ProcessorState::Released;
        Ok(())
    }

    fn invalid(&self, operation: &'static str) -> HarnessError {
        HarnessError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

/// The receive/dispatch loop of a running processor.
///
/// Pulls locked messages and spawns each handler invocation into a
/// [`JoinSet`], so deliveries overlap. On the stop signal it stops pulling
/// and drains the set to empty before returning; with zero messages in
/// flight that drain is simply empty, so the caller still observes the same
/// ordering guarantee.
async fn pump(
    connection: Connection,
    target: SubscriptionTarget,
    on_message: MessageHandler,
    on_error: ErrorHandler,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut in_flight: JoinSet<()> = JoinSet::new();

    loop {
        if *stop_rx.borrow() {
            break;
        }

        // Reap handler tasks that already finished; a lost task is a
        // dispatch fault, not a reason to stop pulling.
        while let Some(result) = in_flight.try_join_next() {
            if let Err(e) = result {
                on_error(PipelineFault {
                    description: format!("message handler task was lost: {e}"),
                    kind: FaultKind::Dispatch,
                });
            }
        }

        match connection.receive_locked(&target.topic, &target.subscription) {
            Ok(Some(locked)) => {
                let delivery = Delivery::new(locked, target.clone(), connection.clone());
                in_flight.spawn(on_message(delivery));
            }
            Ok(None) => {
                if idle_until_signal_or_tick(&mut stop_rx).await {
                    break;
                }
            }
            Err(e) => {
                on_error(PipelineFault {
                    description: e.to_string(),
                    kind: FaultKind::Receive,
                });
                if idle_until_signal_or_tick(&mut stop_rx).await {
                    break;
                }
            }
        }
    }

    // Drain: every dispatched invocation completes before the pump returns.
    while let Some(result) = in_flight.join_next().await {
        if let Err(e) = result {
            on_error(PipelineFault {
                description: format!("message handler task was lost: {e}"),
                kind: FaultKind::Dispatch,
            });
        }
    }
}

/// Waits for either the stop signal or the next poll tick. Returns `true`
/// when the pump should exit its loop (signal sender gone counts as a stop).
async fn idle_until_signal_or_tick(stop_rx: &mut watch::Receiver<bool>) -> bool {
    let changed = tokio::select! {
        changed = stop_rx.changed() => Some(changed),
        _ = tokio::time::sleep(POLL_INTERVAL) => None,
    };
    match changed {
        Some(Err(_)) => true,
        Some(Ok(())) => *stop_rx.borrow(),
        None => false,
    }
}
