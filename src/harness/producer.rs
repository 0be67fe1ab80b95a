use tracing::info;

use crate::client::MessageSink;
use crate::harness::payload::PayloadGenerator;
use crate::utils::HarnessError;

/// Publishes `count` generated payloads through the sink, one at a time.
///
/// Each send completes (the broker acknowledges it) before the next is
/// issued; there is no pipelining or batching. The first failed send aborts
/// the loop and propagates.
pub fn run_producer(
    sink: &MessageSink,
    generator: &mut dyn PayloadGenerator,
    count: u32,
) -> Result<(), HarnessError> {
    for i in 1..=count {
        let sentence = generator.next();
        info!("Sending message {}/{}: {}", i, count, sentence);
        sink.send(sentence)?;
    }
    Ok(())
}
