use std::sync::Arc;

use tracing::{error, info};

use subdrain::config::load_config;
use subdrain::harness::{EmbeddedBroker, RunController, StdinPrompt};
use subdrain::utils::logging;

#[tokio::main]
async fn main() {
    logging::init("info");
    info!("***** Exercising topic/subscription fan-out with peek-lock delivery *****");

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Broker configuration artifact: {}",
        settings.broker.config_path
    );

    let mut provisioner = EmbeddedBroker::new(settings.broker.config_path.clone());
    let controller = RunController::new(settings, Arc::new(StdinPrompt));

    match controller.run(&mut provisioner).await {
        Ok(summary) => {
            for report in &summary.rounds {
                info!(
                    "Round '{}': {} message(s) acknowledged, {} fault(s)",
                    report.subscription, report.received, report.faults
                );
            }
            println!("Run completed successfully!");
        }
        Err(e) => {
            error!("Run aborted: {e}");
            std::process::exit(1);
        }
    }
}
