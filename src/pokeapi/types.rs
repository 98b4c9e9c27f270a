//! Response models for the PokeAPI endpoints
//!
//! These structs mirror the subset of the PokeAPI JSON shapes the Pokedex
//! uses. Unknown fields in responses are ignored.

use serde::{Deserialize, Serialize};

/// A named API resource with a link to its full record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name (e.g. "canalave-city-area", "pikachu")
    pub name: String,
    /// URL of the full resource
    pub url: String,
}

/// One page of the paginated location-area listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas
    pub count: u32,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub previous: Option<String>,
    /// Location areas on this page
    pub results: Vec<NamedResource>,
}

/// Detail record for a single location area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAreaDetail {
    /// Area name
    pub name: String,
    /// Pokemon that can be encountered in this area
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

/// A single encounter slot in a location area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonEncounter {
    /// The encountered Pokemon
    pub pokemon: NamedResource,
}

/// Detail record for a single Pokemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    /// Pokemon name
    pub name: String,
    /// Base experience yield; absent for some special forms
    pub base_experience: Option<u32>,
    /// Height in decimeters
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    /// Base stat values
    pub stats: Vec<PokemonStat>,
    /// Type slots (one or two per Pokemon)
    pub types: Vec<PokemonTypeSlot>,
}

/// A base stat value for a Pokemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    /// The stat value
    pub base_stat: u32,
    /// Which stat this is (hp, attack, ...)
    pub stat: NamedResource,
}

/// A type slot for a Pokemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonTypeSlot {
    /// The type in this slot
    #[serde(rename = "type")]
    pub pokemon_type: NamedResource,
}
