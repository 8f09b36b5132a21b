//! # Magic: The Gathering Deck Building Library
//!
//! decksmith builds 60 card decks from catalog searches, recommends an
//! archetype for a color combination from recorded match results, and
//! estimates how often a deck draws a keepable opening hand. Card searches,
//! deck storage and the match history are reached through traits so the
//! library can run against [Scryfall](https://scryfall.com) and JSON files as
//! well as against in-memory fakes.

#[macro_use]
extern crate serde_derive;
extern crate serde;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate bincode;
extern crate flate2;
extern crate rand;
extern crate regex;

pub mod archetype;
pub mod builder;
pub mod card;
pub mod catalog;
pub mod collection;
pub mod deck;
pub mod error;
pub mod history;
pub mod scryfall;
pub mod simulation;
pub mod store;

pub use crate::archetype::Archetype;
pub use crate::builder::AutoBuilder;
pub use crate::card::{Card, Color};
pub use crate::catalog::CardCatalog;
pub use crate::deck::{CardCounts, Deck};
pub use crate::history::{recommend, MatchRecord, MatchResult};
pub use crate::simulation::{hand_quality, simulate_match, MatchConfig, MatchTally};
