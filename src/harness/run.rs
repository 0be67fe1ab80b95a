use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::client::MessageSink;
use crate::config::Settings;
use crate::harness::payload::LoremGenerator;
use crate::harness::producer::run_producer;
use crate::harness::prompt::UserPrompt;
use crate::harness::provision::BrokerProvisioner;
use crate::harness::round::{RoundReport, run_round};
use crate::processor::SubscriptionTarget;
use crate::utils::HarnessError;

/// The reports of every consumption round of a completed run, in the order
/// the rounds executed.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rounds: Vec<RoundReport>,
}

/// Drives the whole exercise, strictly in sequence: provision the broker,
/// publish the message batch, then one consumption round per configured
/// subscription with an operator pause between phases. Rounds never overlap;
/// any provisioning or publish failure aborts the run.
pub struct RunController {
    settings: Settings,
    prompt: Arc<dyn UserPrompt>,
}

impl RunController {
    pub fn new(settings: Settings, prompt: Arc<dyn UserPrompt>) -> Self {
        Self { settings, prompt }
    }

    pub async fn run(
        &self,
        provisioner: &mut dyn BrokerProvisioner,
    ) -> Result<RunSummary, HarnessError> {
        let harness = &self.settings.harness;

        let endpoint = provisioner.start()?;
        info!("Connection string = {}", endpoint.connection_string());
        info!("Topic used for this run = {}", harness.topic);

        let sink = MessageSink::new(endpoint.connect(), &harness.topic);
        let mut generator = LoremGenerator::new();
        run_producer(&sink, &mut generator, harness.message_count)?;
        self.pause().await;

        let window = Duration::from_secs(harness.round_duration_secs);
        let mut rounds = Vec::with_capacity(harness.subscriptions.len());
        for subscription in &harness.subscriptions {
            let target = SubscriptionTarget::new(&harness.topic, subscription);
            let report = run_round(&endpoint, target, window).await?;
            info!(
                "Subscription '{}': {} message(s) acknowledged, {} fault(s)",
                report.subscription, report.received, report.faults
            );
            rounds.push(report);
            self.pause().await;
        }

        provisioner.stop();
        Ok(RunSummary { rounds })
    }

    async fn pause(&self) {
        info!("Press ENTER to continue...");
        let prompt = self.prompt.clone();
        // The prompt blocks its thread; keep it off the async workers.
        let _ = tokio::task::spawn_blocking(move || prompt.wait()).await;
    }
}
