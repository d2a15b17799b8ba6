// ABOUTME: Prune command implementation.
// ABOUTME: Connects to the registry, runs the pipeline, and publishes the report.

use registry_prune::cancel::Cancellation;
use registry_prune::config::Config;
use registry_prune::error::Result;
use registry_prune::output::Output;
use registry_prune::prune::{RunOutcome, run};
use registry_prune::registry::EcrPublicClient;
use registry_prune::report::Report;

/// Prune dangling images from the configured repository.
///
/// Returns the process exit code decided by the report.
pub async fn prune(config: Config, mut output: Output) -> Result<u8> {
    let settings = config.registry_settings()?;
    output.start_timer();

    let client = EcrPublicClient::connect(&settings).await;

    let (handle, cancellation) = Cancellation::pair();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling run");
            handle.cancel();
        }
    });

    let outcome = run(&client, config.repository.clone(), &cancellation, &output).await;
    interrupt.abort();

    let report = Report::from_outcome(&config.repository, &outcome);
    output.publish(&report.summary, config.summary_file.as_deref());

    match (&outcome, report.should_fail) {
        (RunOutcome::Completed(_), true) => output.error("✗ some images failed to delete"),
        (RunOutcome::Aborted(_), _) => {}
        (RunOutcome::Completed(_), false) => output.success("✓ prune complete"),
    }

    Ok(report.exit_code())
}
