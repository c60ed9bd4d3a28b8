pub mod cli;
pub mod controllers;
pub mod core;
pub mod nav;
pub mod routes;
pub mod session;
pub mod token;
pub mod types;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::Cli;
use crate::core::error::Error;
use crate::core::{config::Args, state::AppState};

pub async fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    let config = Args::load(cli.config.as_deref())?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_default())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let state = AppState::new(&config)?;

    cli::execute(&state, cli.command).await
}
