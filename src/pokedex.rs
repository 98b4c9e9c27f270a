//! The user's collection of caught Pokemon
//!
//! An owned, in-memory map keyed by Pokemon name. Each client of the REPL
//! gets its own instance; nothing here is shared or persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::pokeapi::Pokemon;

/// A caught Pokemon together with when it was caught
#[derive(Debug, Clone)]
pub struct CaughtPokemon {
    /// The full Pokemon record at catch time
    pub pokemon: Pokemon,
    /// When the Pokemon was caught
    pub caught_at: DateTime<Utc>,
}

/// The collection of caught Pokemon, keyed by name
#[derive(Debug, Default)]
pub struct Pokedex {
    caught: HashMap<String, CaughtPokemon>,
}

impl Pokedex {
    /// Creates an empty Pokedex
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a Pokemon as caught, stamping the catch time
    ///
    /// Catching the same Pokemon again replaces the earlier record.
    pub fn add(&mut self, pokemon: Pokemon) {
        self.caught.insert(
            pokemon.name.clone(),
            CaughtPokemon {
                pokemon,
                caught_at: Utc::now(),
            },
        );
    }

    /// Looks up a caught Pokemon by name
    pub fn get(&self, name: &str) -> Option<&CaughtPokemon> {
        self.caught.get(name)
    }

    /// Whether a Pokemon with this name has been caught
    pub fn contains(&self, name: &str) -> bool {
        self.caught.contains_key(name)
    }

    /// Names of all caught Pokemon, sorted alphabetically
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.caught.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether nothing has been caught yet
    pub fn is_empty(&self) -> bool {
        self.caught.is_empty()
    }
}
