//! Infrastructure configuration modules.

pub mod logging;
pub mod poll;
pub mod settings;

pub use logging::LoggingConfig;
pub use poll::PollConfig;
pub use settings::Config;
