//! Handler for the `once` command.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::application::{CycleOutcome, Submission};
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::infrastructure::orchestration::Orchestrator;

/// Run a single cycle and print what happened.
pub async fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();

    let outcome = Orchestrator::run_single(&config).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &CycleOutcome) {
    output::section("Cycle");
    output::field("Since", outcome.previous);
    output::field("Fetched", outcome.fetched);
    output::field("Duplicates", outcome.duplicates);

    for kind in &outcome.failed_kinds {
        output::warning(&format!("{kind} fetch failed; see logs"));
    }
    if outcome.lookup_failed {
        output::warning("Ledger lookup failed; duplicates may have been submitted");
    }

    match &outcome.submission {
        Submission::Skipped => output::field("Submitted", output::muted("nothing new")),
        Submission::Submitted { count } => output::field("Submitted", output::positive(count)),
        Submission::DryRun { count } => {
            output::field("Dry run", format!("{count} record(s) not sent"));
        }
        Submission::Failed { count, reason } => {
            output::field("Failed", output::negative(count));
            output::error(&format!("Submission failed: {reason}"));
        }
    }

    if outcome.records_lost() > 0 {
        output::warning(&format!(
            "{} record(s) will not be fetched again",
            outcome.records_lost()
        ));
    }
    output::field("Watermark", outcome.watermark);
}
