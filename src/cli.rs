//! Command-line interface parsing for the Pokedex REPL
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into validated `Settings` consumed by the API client: the cache TTL, the
//! HTTP request timeout, and the PokeAPI base URL.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

/// Default cache TTL in seconds
const DEFAULT_TTL_SECS: u64 = 60;

/// Default HTTP request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default PokeAPI root
const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The cache TTL must be a positive number of seconds
    #[error("Invalid --ttl: '{0}'. The cache TTL must be greater than zero")]
    InvalidTtl(u64),

    /// The request timeout must be a positive number of seconds
    #[error("Invalid --timeout: '{0}'. The request timeout must be greater than zero")]
    InvalidTimeout(u64),
}

/// Pokedex REPL - browse locations, catch and inspect Pokemon via PokeAPI
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "A Pokedex REPL backed by PokeAPI")]
#[command(version)]
pub struct Cli {
    /// Seconds a cached API response stays valid
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TTL_SECS)]
    pub ttl: u64,

    /// Seconds before an HTTP request times out
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Base URL of the PokeAPI instance to query
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// Validated configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct Settings {
    /// How long cached API responses stay valid
    pub ttl: Duration,
    /// HTTP request timeout
    pub timeout: Duration,
    /// PokeAPI root, without a trailing slash
    pub base_url: String,
}

impl Settings {
    /// Creates Settings from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(Settings)` with validated values
    /// * `Err(CliError)` if the TTL or timeout is zero
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.ttl == 0 {
            return Err(CliError::InvalidTtl(cli.ttl));
        }
        if cli.timeout == 0 {
            return Err(CliError::InvalidTimeout(cli.timeout));
        }

        Ok(Settings {
            ttl: Duration::from_secs(cli.ttl),
            timeout: Duration::from_secs(cli.timeout),
            base_url: cli.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
