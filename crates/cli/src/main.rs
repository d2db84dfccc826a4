use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Request, exit_code, init_tracing, interpolate, render_json};
use console::style;
use core_types::config::load_config;
use embedding_store::EmbeddingStore;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").for_stderr().red().bold());
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let cfg = load_config(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&cfg.logging)?;

    let database = cfg.resolve_database(cli.database.as_deref())?;
    tracing::debug!(database = %database.display(), "resolved embeddings database");
    let store = EmbeddingStore::open(&database)?;

    let request = Request::from_cli(cli, &cfg.interpolate);
    let path = interpolate(&store, &request)?;
    render_json(&path)
}
