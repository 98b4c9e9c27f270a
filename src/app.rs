//! The Pokedex REPL: line reading, tokenizing, and command dispatch
//!
//! The `App` owns the API client (and through it the response cache) and the
//! collection of caught Pokemon. Commands are dispatched off the first word
//! of each input line; command errors are printed and the loop continues.

use std::io::Write;

use rand::Rng;
use tokio::io::AsyncBufReadExt;
use tracing::debug;

use crate::cli::Settings;
use crate::pokeapi::{LocationAreaPage, PokeApiClient, PokeApiError};
use crate::pokedex::Pokedex;

/// Base experience assumed when the API reports none
const FALLBACK_BASE_EXPERIENCE: u32 = 50;

/// Rolls below this value catch the Pokemon
const CATCH_THRESHOLD: u32 = 40;

/// A REPL command with its help text
struct CommandSpec {
    /// The word the user types
    name: &'static str,
    /// One-line description shown by `help`
    description: &'static str,
}

/// Registry of every REPL command, in help-listing order
const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        description: "Displays a help message",
    },
    CommandSpec {
        name: "exit",
        description: "Exit the Pokedex",
    },
    CommandSpec {
        name: "map",
        description: "Displays the names of the next 20 location areas",
    },
    CommandSpec {
        name: "mapb",
        description: "Displays the names of the previous 20 location areas",
    },
    CommandSpec {
        name: "explore",
        description: "Lists the Pokemon found in a location area",
    },
    CommandSpec {
        name: "catch",
        description: "Throws a Pokeball at a Pokemon",
    },
    CommandSpec {
        name: "inspect",
        description: "Shows details of a caught Pokemon",
    },
    CommandSpec {
        name: "pokedex",
        description: "Lists the names of all caught Pokemon",
    },
];

/// Lowercases and whitespace-tokenizes one input line
pub fn clean_input(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Rolls for a catch attempt; higher base experience is harder to catch
fn attempt_catch(base_experience: Option<u32>, rng: &mut impl Rng) -> bool {
    let difficulty = base_experience.unwrap_or(FALLBACK_BASE_EXPERIENCE).max(1);
    rng.gen_range(0..difficulty) < CATCH_THRESHOLD
}

/// REPL state: the API client, the caught collection, and the pagination
/// cursor for the `map`/`mapb` commands
pub struct App {
    client: PokeApiClient,
    pokedex: Pokedex,
    /// URL of the next listing page; `None` once the listing is exhausted
    map_next: Option<String>,
    /// URL of the previous listing page; `None` on the first page
    map_previous: Option<String>,
    should_exit: bool,
}

impl App {
    /// Creates the REPL state from validated settings
    pub fn new(settings: &Settings) -> Result<Self, PokeApiError> {
        let client = PokeApiClient::new(settings)?;
        Ok(Self::with_client(client))
    }

    /// Creates the REPL state around an existing client
    fn with_client(client: PokeApiClient) -> Self {
        let map_next = Some(client.location_areas_url());
        Self {
            client,
            pokedex: Pokedex::new(),
            map_next,
            map_previous: None,
            should_exit: false,
        }
    }

    /// Runs the prompt/read/dispatch loop until `exit` or end of input
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

        while !self.should_exit {
            print!("Pokedex > ");
            std::io::stdout().flush()?;

            match lines.next_line().await? {
                Some(line) => {
                    let words = clean_input(&line);
                    if let Some((command, args)) = words.split_first() {
                        self.dispatch(command, args).await;
                    }
                }
                None => {
                    // stdin closed
                    println!();
                    self.command_exit();
                }
            }
        }

        debug!("stopping cache sweep");
        self.client.cache().shutdown().await;
        Ok(())
    }

    /// Dispatches one tokenized command, printing any command error
    async fn dispatch(&mut self, command: &str, args: &[String]) {
        let result = match command {
            "help" => {
                self.command_help();
                Ok(())
            }
            "exit" => {
                self.command_exit();
                Ok(())
            }
            "map" => self.command_map().await,
            "mapb" => self.command_map_back().await,
            "explore" => self.command_explore(args).await,
            "catch" => self.command_catch(args).await,
            "inspect" => {
                self.command_inspect(args);
                Ok(())
            }
            "pokedex" => {
                self.command_pokedex();
                Ok(())
            }
            _ => {
                println!(
                    "Unknown command: {}. Type 'help' for a list of commands.",
                    command
                );
                Ok(())
            }
        };

        if let Err(error) = result {
            println!("{}", error);
        }
    }

    fn command_help(&self) {
        println!("Welcome to the Pokedex!");
        println!("Usage:");
        println!();
        for command in COMMANDS {
            println!("{}: {}", command.name, command.description);
        }
    }

    fn command_exit(&mut self) {
        println!("Closing the Pokedex... Goodbye!");
        self.should_exit = true;
    }

    /// Shows the next page of location areas
    async fn command_map(&mut self) -> Result<(), PokeApiError> {
        let Some(url) = self.map_next.clone() else {
            println!("No more locations to display.");
            return Ok(());
        };

        let page = self.client.list_location_areas(&url).await?;
        self.show_page(page);
        Ok(())
    }

    /// Shows the previous page of location areas
    async fn command_map_back(&mut self) -> Result<(), PokeApiError> {
        let Some(url) = self.map_previous.clone() else {
            println!("No previous locations to display.");
            return Ok(());
        };

        let page = self.client.list_location_areas(&url).await?;
        self.show_page(page);
        Ok(())
    }

    /// Prints a listing page and advances the pagination cursor
    fn show_page(&mut self, page: LocationAreaPage) {
        for area in &page.results {
            println!("{}", area.name);
        }
        self.map_previous = page.previous;
        self.map_next = page.next;
    }

    async fn command_explore(&mut self, args: &[String]) -> Result<(), PokeApiError> {
        let Some(name) = args.first() else {
            println!("Usage: explore <location-area>");
            return Ok(());
        };

        println!("Exploring {}...", name);
        let detail = self.client.get_location_area(name).await?;

        println!("Found Pokemon:");
        for encounter in &detail.pokemon_encounters {
            println!(" - {}", encounter.pokemon.name);
        }
        Ok(())
    }

    async fn command_catch(&mut self, args: &[String]) -> Result<(), PokeApiError> {
        let Some(name) = args.first() else {
            println!("Usage: catch <pokemon>");
            return Ok(());
        };
        if self.pokedex.contains(name) {
            println!("{} is already in your Pokedex.", name);
            return Ok(());
        }

        println!("Throwing a Pokeball at {}...", name);
        let pokemon = self.client.get_pokemon(name).await?;

        if attempt_catch(pokemon.base_experience, &mut rand::thread_rng()) {
            println!("{} was caught!", pokemon.name);
            println!("You may now inspect it with the inspect command.");
            self.pokedex.add(pokemon);
        } else {
            println!("{} escaped!", pokemon.name);
        }
        Ok(())
    }

    fn command_inspect(&self, args: &[String]) {
        let Some(name) = args.first() else {
            println!("Usage: inspect <pokemon>");
            return;
        };
        let Some(caught) = self.pokedex.get(name) else {
            println!("You have not caught that Pokemon.");
            return;
        };

        let pokemon = &caught.pokemon;
        println!("Name: {}", pokemon.name);
        println!("Height: {}", pokemon.height);
        println!("Weight: {}", pokemon.weight);
        println!(
            "Caught: {}",
            caught.caught_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        println!("Stats:");
        for stat in &pokemon.stats {
            println!("  -{}: {}", stat.stat.name, stat.base_stat);
        }
        println!("Types:");
        for slot in &pokemon.types {
            println!("  - {}", slot.pokemon_type.name);
        }
    }

    fn command_pokedex(&self) {
        if self.pokedex.is_empty() {
            println!("Your Pokedex is empty. Go catch some Pokemon!");
            return;
        }

        println!("Your Pokedex:");
        for name in self.pokedex.names() {
            println!(" - {}", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_app(server: &MockServer) -> App {
        App::with_client(PokeApiClient::with_base_url(
            server.uri(),
            Duration::from_secs(60),
        ))
    }

    fn page_body(next: Option<&str>, previous: Option<&str>, names: &[&str]) -> String {
        let results: Vec<String> = names
            .iter()
            .map(|name| {
                format!(
                    r#"{{"name": "{}", "url": "https://pokeapi.co/api/v2/location-area/{}/"}}"#,
                    name, name
                )
            })
            .collect();
        format!(
            r#"{{"count": 2, "next": {}, "previous": {}, "results": [{}]}}"#,
            next.map_or("null".to_string(), |u| format!("\"{}\"", u)),
            previous.map_or("null".to_string(), |u| format!("\"{}\"", u)),
            results.join(",")
        )
    }

    #[test]
    fn test_clean_input_lowercases_and_splits() {
        assert_eq!(clean_input("Catch PIKACHU"), vec!["catch", "pikachu"]);
    }

    #[test]
    fn test_clean_input_collapses_whitespace() {
        assert_eq!(
            clean_input("  explore   pastoria-city-area  "),
            vec!["explore", "pastoria-city-area"]
        );
    }

    #[test]
    fn test_clean_input_empty_line() {
        assert!(clean_input("").is_empty());
        assert!(clean_input("   \t  ").is_empty());
    }

    #[test]
    fn test_command_registry_is_complete_and_unique() {
        let names: Vec<&str> = COMMANDS.iter().map(|c| c.name).collect();
        for expected in [
            "help", "exit", "map", "mapb", "explore", "catch", "inspect", "pokedex",
        ] {
            assert!(names.contains(&expected), "missing command {}", expected);
        }
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len(), "duplicate command names");
        assert!(COMMANDS.iter().all(|c| !c.description.is_empty()));
    }

    #[test]
    fn test_attempt_catch_weak_pokemon_always_caught() {
        // With difficulty at or below the threshold every roll succeeds
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(attempt_catch(Some(10), &mut rng));
            assert!(attempt_catch(Some(CATCH_THRESHOLD), &mut rng));
        }
    }

    #[test]
    fn test_attempt_catch_strong_pokemon_can_escape() {
        let mut rng = StdRng::seed_from_u64(7);
        let escapes = (0..1000)
            .filter(|_| !attempt_catch(Some(1_000_000), &mut rng))
            .count();
        assert!(escapes > 0, "a very strong pokemon should escape sometimes");
    }

    #[test]
    fn test_attempt_catch_without_base_experience_uses_fallback() {
        // Fallback difficulty is 50, so both outcomes must be possible
        let mut rng = StdRng::seed_from_u64(42);
        let caught = (0..1000).filter(|_| attempt_catch(None, &mut rng)).count();
        assert!(caught > 0);
        assert!(caught < 1000);
    }

    #[tokio::test]
    async fn test_map_advances_and_mapb_returns() {
        let server = MockServer::start().await;
        let page2_url = format!("{}/location-area/?offset=20", server.uri());
        let page1_url = format!("{}/location-area/", server.uri());

        Mock::given(method("GET"))
            .and(path("/location-area/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                page_body(Some(&page2_url), None, &["area-one"]),
                "application/json",
            ))
            .mount(&server)
            .await;
        let mut app = create_test_app(&server);

        app.command_map().await.expect("first page should load");
        assert_eq!(app.map_next.as_deref(), Some(page2_url.as_str()));
        assert!(app.map_previous.is_none());

        // The second page links back to the first
        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/location-area/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                page_body(None, Some(&page1_url), &["area-two"]),
                "application/json",
            ))
            .mount(&server)
            .await;

        app.command_map().await.expect("second page should load");
        assert!(app.map_next.is_none());
        assert_eq!(app.map_previous.as_deref(), Some(page1_url.as_str()));

        // mapb walks back to the first page and the cursor follows
        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/location-area/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                page_body(Some(&page2_url), None, &["area-one"]),
                "application/json",
            ))
            .mount(&server)
            .await;

        app.command_map_back()
            .await
            .expect("previous page should load");
        assert_eq!(app.map_next.as_deref(), Some(page2_url.as_str()));
        assert!(app.map_previous.is_none());
    }

    #[tokio::test]
    async fn test_map_reports_end_of_listing_without_fetching() {
        let server = MockServer::start().await;
        let mut app = create_test_app(&server);
        app.map_next = None;

        // No mock is mounted, so any request would 404 into an error
        app.command_map()
            .await
            .expect("exhausted listing is not an error");
    }

    #[tokio::test]
    async fn test_mapb_on_first_page_is_a_notice_not_an_error() {
        let server = MockServer::start().await;
        let mut app = create_test_app(&server);

        app.command_map_back()
            .await
            .expect("no previous page is not an error");
        assert!(app.map_previous.is_none());
    }

    #[tokio::test]
    async fn test_map_error_keeps_cursor_for_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/location-area/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let mut app = create_test_app(&server);
        let before = app.map_next.clone();

        let result = app.command_map().await;

        assert!(result.is_err());
        assert_eq!(app.map_next, before, "failed fetch must not advance the cursor");
    }

    #[tokio::test]
    async fn test_catch_weak_pokemon_lands_in_pokedex() {
        let server = MockServer::start().await;
        let body = r#"{"name": "caterpie", "base_experience": 10, "height": 3,
                       "weight": 29, "stats": [], "types": []}"#;
        Mock::given(method("GET"))
            .and(path("/pokemon/caterpie/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .expect(1)
            .mount(&server)
            .await;
        let mut app = create_test_app(&server);

        // Base experience 10 is below the catch threshold: always caught
        app.command_catch(&["caterpie".to_string()])
            .await
            .expect("catch should succeed");
        assert!(app.pokedex.contains("caterpie"));

        // A second catch is answered from the Pokedex, not the network
        app.command_catch(&["caterpie".to_string()])
            .await
            .expect("re-catch is a notice, not an error");
    }

    #[tokio::test]
    async fn test_catch_unknown_pokemon_reports_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pokemon/missingno/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let mut app = create_test_app(&server);

        let error = app
            .command_catch(&["missingno".to_string()])
            .await
            .expect_err("unknown pokemon should error");

        assert!(matches!(error, PokeApiError::NotFound { .. }));
        assert!(!app.pokedex.contains("missingno"));
    }

    #[tokio::test]
    async fn test_catch_without_argument_is_usage_notice() {
        let server = MockServer::start().await;
        let mut app = create_test_app(&server);

        app.command_catch(&[])
            .await
            .expect("missing argument is a usage notice, not an error");
        assert!(app.pokedex.is_empty());
    }

    #[tokio::test]
    async fn test_explore_lists_encounters() {
        let server = MockServer::start().await;
        let body = r#"{"name": "great-marsh-area-1",
                       "pokemon_encounters": [
                           {"pokemon": {"name": "tangela", "url": "u"}},
                           {"pokemon": {"name": "yanma", "url": "u"}}
                       ]}"#;
        Mock::given(method("GET"))
            .and(path("/location-area/great-marsh-area-1/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;
        let mut app = create_test_app(&server);

        app.command_explore(&["great-marsh-area-1".to_string()])
            .await
            .expect("explore should succeed");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command_does_not_crash() {
        let server = MockServer::start().await;
        let mut app = create_test_app(&server);

        app.dispatch("blorp", &[]).await;

        assert!(!app.should_exit);
    }

    #[tokio::test]
    async fn test_dispatch_exit_sets_exit_flag() {
        let server = MockServer::start().await;
        let mut app = create_test_app(&server);

        app.dispatch("exit", &[]).await;

        assert!(app.should_exit);
    }
}
