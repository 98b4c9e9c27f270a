//! Pokedex CLI - a REPL for browsing, catching, and inspecting Pokemon
//!
//! Reads commands from stdin, queries PokeAPI through an in-memory response
//! cache, and keeps caught Pokemon in a local collection for the session.

mod app;
mod cache;
mod cli;
mod pokeapi;
mod pokedex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::{Cli, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(2);
        }
    };

    // Logs go to stderr; the REPL owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut app = App::new(&settings)?;
    app.run().await?;

    Ok(())
}
