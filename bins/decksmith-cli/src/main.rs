extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
#[macro_use]
extern crate log;
extern crate decksmith;

mod scryfall_client;

use clap::{Parser, Subcommand};
use decksmith::archetype::Archetype;
use decksmith::builder::AutoBuilder;
use decksmith::card::{parse_colors, Card};
use decksmith::catalog::{CachedCatalog, CardCatalog};
use decksmith::deck::{validate_deck_name, Deck};
use decksmith::error::{CatalogError, DecklistError, InputError, StoreError};
use decksmith::history::{pick_archetype, recommend, MatchRecord, MatchResult};
use decksmith::simulation::{self, is_basic_land, keep_rate, simulate_match, MatchConfig};
use decksmith::store::{CollectionStore, DataDir, DeckStore, MatchHistoryStore};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use scryfall_client::ScryfallClient;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Builds, stores and simulates Magic: The Gathering decks
#[derive(Parser, Debug)]
#[command(name = "decksmith", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Search the card catalog
    Search {
        #[arg(required = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },
    /// Show one card
    Card {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// List saved decks
    Decks,
    /// List the cards of a deck
    Show { deck: String },
    /// Create an empty deck
    New { deck: String },
    /// Add copies of a card to a deck
    Add {
        deck: String,
        quantity: usize,
        #[arg(required = true)]
        card: Vec<String>,
    },
    /// Remove copies of a card from a deck
    Remove {
        deck: String,
        quantity: usize,
        #[arg(required = true)]
        card: Vec<String>,
    },
    /// Save a deck list file as a deck
    Import { deck: String, file: PathBuf },
    /// Print a deck as a deck list
    Export { deck: String },
    /// Best archetype for the colors, e.g. RG
    Recommend { colors: String },
    /// Auto-build and save a 60 card deck
    Build {
        colors: String,
        /// aggro, midrange or control; recommended from the match history if omitted
        archetype: Option<Archetype>,
    },
    /// Simulate opening hands of two decks
    Simulate {
        deck_a: String,
        deck_b: String,
        #[arg(default_value_t = simulation::ITERATIONS)]
        games: usize,
    },
    /// Record a match result (W, L or T)
    Record {
        deck: String,
        opponent: String,
        result: MatchResult,
    },
    /// List recorded match results
    History,
    /// List the card collection
    Collection,
    /// Add cards to the collection
    Collect {
        quantity: usize,
        #[arg(required = true)]
        card: Vec<String>,
    },
    /// Remove cards from the collection
    Uncollect {
        quantity: usize,
        #[arg(required = true)]
        card: Vec<String>,
    },
}

#[derive(Debug)]
enum Error {
    NotFound(String),
    Input(InputError),
    Decklist(DecklistError),
    Catalog(CatalogError),
    Store(StoreError),
    Config(config::ConfigError),
    Http(reqwest::Error),
    Io(std::io::Error),
}

impl From<InputError> for Error {
    fn from(error: InputError) -> Self {
        Self::Input(error)
    }
}

impl From<DecklistError> for Error {
    fn from(error: DecklistError) -> Self {
        Self::Decklist(error)
    }
}

impl From<CatalogError> for Error {
    fn from(error: CatalogError) -> Self {
        Self::Catalog(error)
    }
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}

impl From<config::ConfigError> for Error {
    fn from(error: config::ConfigError) -> Self {
        Self::Config(error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

/// Settings read from DECKSMITH_* environment variables
#[derive(Debug, Deserialize)]
struct Settings {
    data_dir: String,
    scryfall_url: String,
    request_delay_ms: u64,
}

impl Settings {
    fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("data_dir", "data")?
            .set_default("scryfall_url", "https://api.scryfall.com")?
            .set_default("request_delay_ms", 100i64)?
            .add_source(config::Environment::with_prefix("DECKSMITH").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

type Catalog = CachedCatalog<ScryfallClient>;

struct App {
    settings: Settings,
    data: DataDir,
}

impl App {
    fn catalog(&self) -> Result<Catalog, Error> {
        let client = ScryfallClient::new(
            &self.settings.scryfall_url,
            Duration::from_millis(self.settings.request_delay_ms),
        )?;
        let catalog = CachedCatalog::new(client);
        if let Err(e) = catalog.load(&self.data.card_cache()) {
            warn!("Ignoring card cache: {:?}", e);
        }
        Ok(catalog)
    }

    fn save_cache(&self, catalog: &Catalog) {
        if let Err(e) = catalog.save(&self.data.card_cache()) {
            warn!("Cannot save card cache: {:?}", e);
        }
    }

    fn load_deck(&self, name: &str) -> Result<Deck, Error> {
        self.data
            .decks
            .load(name)?
            .ok_or_else(|| Error::NotFound(format!("deck \"{}\"", name)))
    }

    fn search(&self, query: &str) -> Result<(), Error> {
        let catalog = self.catalog()?;
        let cards = catalog.search(query)?;
        if cards.is_empty() {
            println!("(no results)");
        }
        for card in &cards {
            println!("{}", describe(card));
        }
        self.save_cache(&catalog);
        Ok(())
    }

    fn card(&self, name: &str) -> Result<(), Error> {
        let catalog = self.catalog()?;
        let card = catalog
            .lookup_exact(name)?
            .ok_or_else(|| Error::NotFound(format!("card \"{}\"", name)))?;
        println!("{}", describe(&card));
        if let Some(text) = &card.oracle_text {
            println!("{}", text);
        }
        if let Some(uri) = &card.image_uri {
            println!("{}", uri);
        }
        self.save_cache(&catalog);
        Ok(())
    }

    fn decks(&self) -> Result<(), Error> {
        let names = self.data.decks.list_names()?;
        if names.is_empty() {
            println!("No saved decks found.");
        }
        for name in names {
            println!("{}", name);
        }
        Ok(())
    }

    fn show(&self, name: &str) -> Result<(), Error> {
        let deck = self.load_deck(name)?;
        let catalog = self.catalog()?;
        let flagged: Vec<&str> = deck
            .duplicate_nonlands(|name| is_land(&catalog, name))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        println!("{} ({} cards)", deck.name, deck.total_cards());
        for (card, qty) in deck.cards.iter() {
            let flag = if flagged.contains(&card) { " ⚠" } else { "" };
            println!("{}× {}{}", qty, card, flag);
        }
        self.save_cache(&catalog);
        Ok(())
    }

    fn new_deck(&self, name: &str) -> Result<(), Error> {
        validate_deck_name(name)?;
        if self.data.decks.load(name)?.is_some() {
            println!("Deck \"{}\" already exists.", name);
            return Ok(());
        }
        self.data.decks.save(&Deck::new(name))?;
        println!("Deck \"{}\" created.", name);
        Ok(())
    }

    fn add(&self, name: &str, qty: usize, card_name: &str) -> Result<(), Error> {
        let mut deck = self.load_deck(name)?;
        let catalog = self.catalog()?;
        let card = catalog
            .lookup_exact(card_name)?
            .ok_or_else(|| Error::NotFound(format!("card \"{}\"", card_name)))?;
        deck.add_card(&card.name, qty);
        self.data.decks.save(&deck)?;
        println!("{} ({} cards)", deck.name, deck.total_cards());
        self.save_cache(&catalog);
        Ok(())
    }

    fn remove(&self, name: &str, qty: usize, card_name: &str) -> Result<(), Error> {
        let mut deck = self.load_deck(name)?;
        let removed = deck.remove_card(card_name, qty);
        self.data.decks.save(&deck)?;
        println!(
            "Removed {} {}. {} ({} cards)",
            removed,
            card_name,
            deck.name,
            deck.total_cards()
        );
        Ok(())
    }

    fn import(&self, name: &str, path: &Path) -> Result<(), Error> {
        validate_deck_name(name)?;
        let list = std::fs::read_to_string(path)?;
        let deck = Deck::from_list(name, &list)?;
        self.data.decks.save(&deck)?;
        println!("{} ({} cards)", deck.name, deck.total_cards());
        Ok(())
    }

    fn export(&self, name: &str) -> Result<(), Error> {
        print!("{}", self.load_deck(name)?.to_list());
        Ok(())
    }

    fn recommend(&self, colors: &str) -> Result<(), Error> {
        let colors = parse_colors(colors)?;
        let history = self.data.history.load_all()?;
        match recommend(&colors, &history)? {
            Some(rec) => println!(
                "{} ({:.1}% of {} decisive games)",
                rec.archetype,
                rec.win_rate * 100.0,
                rec.score.games()
            ),
            None => println!("No recommendation, no decisive games recorded for these colors."),
        }
        Ok(())
    }

    fn build(&self, colors: &str, manual: Option<Archetype>) -> Result<(), Error> {
        let colors = parse_colors(colors)?;
        let history = self.data.history.load_all()?;
        let recommendation = recommend(&colors, &history)?;
        let archetype = pick_archetype(manual, recommendation);
        info!("Building {} deck", archetype);
        let catalog = self.catalog()?;
        let deck = AutoBuilder::new(&catalog).build(&colors, archetype)?;
        self.data.decks.save(&deck)?;
        print!("{}", deck.to_list());
        println!("{} ({} cards)", deck.name, deck.total_cards());
        self.save_cache(&catalog);
        Ok(())
    }

    fn simulate(&self, a: &str, b: &str, iterations: usize) -> Result<(), Error> {
        let deck_a = self.load_deck(a)?;
        let deck_b = self.load_deck(b)?;
        let config = MatchConfig {
            iterations,
            ..MatchConfig::default()
        };
        let mut rng = SmallRng::from_entropy();
        let tally = simulate_match(&mut rng, &deck_a.cards, &deck_b.cards, &config);
        println!(
            "{} wins {}, {} wins {}, ties {}",
            deck_a.name, tally.wins_a, deck_b.name, tally.wins_b, tally.ties
        );
        for deck in &[&deck_a, &deck_b] {
            let rate = keep_rate(&mut rng, &deck.cards, config.hand_size, iterations);
            println!("{}: {:.1}% keepable hands", deck.name, rate * 100.0);
        }
        Ok(())
    }

    fn record(&self, deck: &str, opponent: &str, result: MatchResult) -> Result<(), Error> {
        self.data
            .history
            .append(MatchRecord::now(deck, opponent, result))?;
        println!("Recorded {} vs {}: {}", deck, opponent, result);
        Ok(())
    }

    fn history(&self) -> Result<(), Error> {
        for record in self.data.history.load_all()? {
            let when = record
                .recorded_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!(
                "{} {} vs {} {}",
                record.result, record.deck, record.opponent, when
            );
        }
        Ok(())
    }

    fn collection(&self) -> Result<(), Error> {
        let collection = self.data.collection.load()?;
        for (name, qty) in collection.sorted() {
            println!("{}× {}", qty, name);
        }
        println!("{} cards", collection.total());
        Ok(())
    }

    fn collect(&self, qty: usize, card_name: &str) -> Result<(), Error> {
        let catalog = self.catalog()?;
        let card = catalog
            .lookup_exact(card_name)?
            .ok_or_else(|| Error::NotFound(format!("card \"{}\"", card_name)))?;
        let mut collection = self.data.collection.load()?;
        collection.add(&card.name, qty);
        self.data.collection.save(&collection)?;
        println!("{}× {}", collection.count(&card.name), card.name);
        self.save_cache(&catalog);
        Ok(())
    }

    fn uncollect(&self, qty: usize, card_name: &str) -> Result<(), Error> {
        let mut collection = self.data.collection.load()?;
        let removed = collection.remove(card_name, qty);
        self.data.collection.save(&collection)?;
        println!("Removed {} {}", removed, card_name);
        Ok(())
    }
}

fn describe(card: &Card) -> String {
    format!(
        "{}  •  {}  •  {}  [{:?}]",
        card.name,
        card.mana_cost.as_deref().unwrap_or(""),
        card.type_line,
        card.rarity
    )
}

/// Basic lands are known without asking the catalog; unknown cards count as nonlands
fn is_land(catalog: &Catalog, name: &str) -> bool {
    if is_basic_land(name) {
        return true;
    }
    match catalog.lookup_exact(name) {
        Ok(Some(card)) => card.is_land(),
        Ok(None) => false,
        Err(e) => {
            warn!("Cannot look up {}: {}", name, e);
            false
        }
    }
}

fn main() -> Result<(), Error> {
    let _ = env_logger::try_init();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    debug!("{:?}", settings);
    let app = App {
        data: DataDir::new(&settings.data_dir),
        settings,
    };
    match cli.command {
        Command::Search { query } => app.search(&query.join(" ")),
        Command::Card { name } => app.card(&name.join(" ")),
        Command::Decks => app.decks(),
        Command::Show { deck } => app.show(&deck),
        Command::New { deck } => app.new_deck(&deck),
        Command::Add {
            deck,
            quantity,
            card,
        } => app.add(&deck, quantity, &card.join(" ")),
        Command::Remove {
            deck,
            quantity,
            card,
        } => app.remove(&deck, quantity, &card.join(" ")),
        Command::Import { deck, file } => app.import(&deck, &file),
        Command::Export { deck } => app.export(&deck),
        Command::Recommend { colors } => app.recommend(&colors),
        Command::Build { colors, archetype } => app.build(&colors, archetype),
        Command::Simulate {
            deck_a,
            deck_b,
            games,
        } => app.simulate(&deck_a, &deck_b, games),
        Command::Record {
            deck,
            opponent,
            result,
        } => app.record(&deck, &opponent, result),
        Command::History => app.history(),
        Command::Collection => app.collection(),
        Command::Collect { quantity, card } => app.collect(quantity, &card.join(" ")),
        Command::Uncollect { quantity, card } => app.uncollect(quantity, &card.join(" ")),
    }
}
