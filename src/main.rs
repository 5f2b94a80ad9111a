use clap::Parser;
use ledgerbridge::adapter::inbound::cli::command::Cli;
use ledgerbridge::adapter::inbound::cli::{dispatch, output};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = dispatch::execute(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
