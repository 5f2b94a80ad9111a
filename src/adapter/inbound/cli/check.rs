//! Handler for the `check` command.

use std::path::Path;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Validate the configuration file and print the resolved settings.
///
/// Missing credentials are reported as warnings; only a file that cannot be
/// read, parsed or validated is an error.
pub fn execute(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;

    output::section("Configuration Check");
    output::field("Config", config_path.display());
    output::success("Configuration file is valid");

    output::section("Binance");
    output::field("API URL", &config.binance.api_url);
    output::field("recvWindow", format!("{} ms", config.binance.recv_window_ms));
    output::field("P2P page rows", config.binance.p2p_page_rows);
    output::field("Timeout", format!("{} ms", config.binance.http.timeout_ms));

    output::section("Ledger");
    output::field("Base URL", &config.ledger.base_url);
    output::field("Records", &config.ledger.records_path);
    output::field("Bulk insert", &config.ledger.bulk_path);
    output::field("Key header", &config.ledger.api_key_header);

    output::section("Polling");
    output::field("Interval", format!("{} s", config.poll.interval_secs));
    output::field(
        "Start",
        config
            .poll
            .initial_watermark()
            .since()
            .map_or_else(|| output::muted("full history"), |d| d.to_rfc3339()),
    );
    output::field("Policy", config.poll.watermark_policy);
    output::field(
        "Checkpoint",
        config
            .poll
            .checkpoint_file
            .as_ref()
            .map_or_else(|| output::muted("in memory"), |p| p.display().to_string()),
    );
    output::field("Dry run", config.dry_run);

    output::section("Credentials");
    let missing = config.missing_credentials();
    if missing.is_empty() {
        output::success("All credentials present");
    } else {
        for name in missing {
            output::warning(&format!("{name} is not set (required for run and once)"));
        }
    }

    Ok(())
}
