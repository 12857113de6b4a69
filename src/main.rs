use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;
use tracing::error;

use lantern::cli::{run, Cli};
use lantern::logging::init_logging;
use lantern::{ApiClient, ApiResult, LanternConfig, Session, TokenStore};

async fn start(cli: Cli) -> ApiResult<ExitCode> {
    let config = LanternConfig::load(&cli.config)?;
    let session = Session::load(TokenStore::File(config.session_file.clone()))?;
    let client = ApiClient::from_config(&config, session)?;
    run(cli.command, &client).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match start(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err.message().red());
            ExitCode::FAILURE
        }
    }
}
