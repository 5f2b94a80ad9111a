mod support;

use ledgerbridge::application::WatermarkPolicy;
use ledgerbridge::error::{ConfigError, Error};
use ledgerbridge::infrastructure::config::Config;
use support::config::{TempConfig, VALID_CONFIG};

#[test]
fn example_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");

    let config = Config::load(path).expect("example config should be valid");

    assert_eq!(config.binance.api_url, "https://api.binance.com");
    assert_eq!(config.poll.watermark_policy, WatermarkPolicy::Always);
}

#[test]
fn valid_config_loads_from_file() {
    let file = TempConfig::new(VALID_CONFIG);

    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.ledger.base_url, "https://ledger.example.com");
    assert_eq!(config.poll.watermark_policy, WatermarkPolicy::Confirmed);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn config_rejects_zero_page_rows() {
    let toml = VALID_CONFIG.replace("recv_window_ms = 5000", "recv_window_ms = 5000\np2p_page_rows = 0");
    let file = TempConfig::new(&toml);

    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "p2p_page_rows",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid page rows error, got {err}"),
        Ok(config) => panic!(
            "Expected zero page rows to be rejected, got {}",
            config.binance.p2p_page_rows
        ),
    }
}

#[test]
fn config_rejects_zero_retry_attempts() {
    let toml = format!("{VALID_CONFIG}\n[ledger.http]\nretry_max_attempts = 0\n");
    let file = TempConfig::new(&toml);

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "ledger.http",
            ..
        }))
    ));
}

#[test]
fn config_reports_toml_syntax_errors() {
    let file = TempConfig::new("[ledger\nbase_url = ");

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn config_rejects_bad_initial_watermark() {
    let toml = VALID_CONFIG.replace(
        "interval_secs = 60",
        "interval_secs = 60\ninitial_watermark = \"yesterday\"",
    );
    let file = TempConfig::new(&toml);

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn relative_checkpoint_path_is_kept_verbatim() {
    let toml = VALID_CONFIG.replace(
        "interval_secs = 60",
        "interval_secs = 60\ncheckpoint_file = \"state/wm.json\"",
    );
    let file = TempConfig::new(&toml);

    let config = Config::load(file.path()).unwrap();

    assert_eq!(
        config.poll.checkpoint_file,
        Some(std::path::PathBuf::from("state/wm.json"))
    );
}
