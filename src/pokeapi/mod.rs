//! PokeAPI client and response models
//!
//! This module contains the HTTP client used by the REPL commands and the
//! serde models for the PokeAPI endpoints it queries: the paginated
//! location-area listing, location-area details, and Pokemon details.

pub mod client;
pub mod types;

pub use client::{PokeApiClient, PokeApiError};
pub use types::{
    LocationAreaDetail, LocationAreaPage, NamedResource, Pokemon, PokemonEncounter, PokemonStat,
    PokemonTypeSlot,
};
