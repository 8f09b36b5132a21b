//! # Error types
//!
use crate::card::Color;
use thiserror::Error;

/// Rejected user input. Raised before any build, recommendation or
/// simulation work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
  #[error("invalid color symbol '{0}', expected one of W, U, B, R, G")]
  InvalidColor(String),
  #[error("expected 1 to 3 colors, got {0}")]
  ColorCount(usize),
  #[error("color {0} listed more than once")]
  DuplicateColor(Color),
  #[error("invalid archetype '{0}', expected aggro, midrange or control")]
  InvalidArchetype(String),
  #[error("invalid match result '{0}', expected W, L or T")]
  InvalidResult(String),
  #[error("deck name must not be empty")]
  EmptyDeckName,
}

/// Failure reported by a card catalog
#[derive(Error, Debug)]
pub enum CatalogError {
  #[error("catalog request failed: {0}")]
  Transport(String),
  #[error("catalog returned status {status}: {details}")]
  Api { status: u16, details: String },
  #[error("cannot decode catalog response: {0}")]
  Json(#[from] serde_json::Error),
}

/// Failure reported by the deck, collection or match history stores
#[derive(Error, Debug)]
pub enum StoreError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
  #[error("bincode error: {0}")]
  Bincode(#[from] bincode::Error),
  #[error(transparent)]
  Input(#[from] InputError),
}

/// Malformed decklist text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct DecklistError {
  pub line: usize,
  pub reason: String,
}
