use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use tracing::{error, info};

use crate::harness::provision::BrokerEndpoint;
use crate::processor::{
    Delivery, DeliveryMode, ErrorHandler, MessageHandler, PipelineFault, SubscriptionProcessor,
    SubscriptionTarget,
};
use crate::utils::HarnessError;

/// What one consumption round observed.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub subscription: String,
    /// Deliveries handled and acknowledged during the round.
    pub received: usize,
    /// Pipeline faults routed to the error handler during the round.
    pub faults: usize,
}

/// Runs one subscription processor through its full lifecycle.
///
/// Create, attach, start, hold the window open, stop, release. The window is
/// a pure time gate: the round ends when it elapses whether or not anything
/// arrived, and a zero window starts and stops the processor immediately.
/// Pipeline faults are logged and counted but never abort the round.
pub async fn run_round(
    endpoint: &BrokerEndpoint,
    target: SubscriptionTarget,
    window: Duration,
) -> Result<RoundReport, HarnessError> {
    info!("Processing subscription: {}", target.subscription);

    let mut processor =
        SubscriptionProcessor::new(endpoint.connect(), target.clone(), DeliveryMode::PeekLock);

    let received = Arc::new(AtomicUsize::new(0));
    let faults = Arc::new(AtomicUsize::new(0));

    // The handler logs and then acknowledges unconditionally; it performs no
    // content-based filtering or rejection.
    let on_message: MessageHandler = {
        let received = received.clone();
        Arc::new(move |delivery: Delivery| {
            let received = received.clone();
            async move {
                info!(
                    "Message received: sequence = {} | body = {}",
                    delivery.sequence_number(),
                    delivery.body()
                );
                delivery.acknowledge();
                received.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    };
    let on_error: ErrorHandler = {
        let faults = faults.clone();
        Arc::new(move |fault: PipelineFault| {
            error!(
                "Error while processing messages: {} | {:?}",
                fault.description, fault.kind
            );
            faults.fetch_add(1, Ordering::SeqCst);
        })
    };

    processor.attach(on_message, on_error)?;

    info!(
        "Starting the processor and listening for {} second(s)...",
        window.as_secs_f64()
    );
    processor.start()?;

    tokio::time::sleep(window).await;

    processor.stop().await?;
    processor.release()?;

    info!("Finished processing subscription: {}", target.subscription);
    Ok(RoundReport {
        subscription: target.subscription,
        received: received.load(Ordering::SeqCst),
        faults: faults.load(Ordering::SeqCst),
    })
}
