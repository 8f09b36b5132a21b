//! # Card catalog
//!
//! The `CardCatalog` trait is the seam between the deck tools and a remote
//! card database. `Query` renders the search syntax the builder needs,
//! `StaticCatalog` answers from memory and `CachedCatalog` adds a name to
//! card cache in front of any other catalog.
use crate::card::{Card, Color};
use crate::error::{CatalogError, StoreError};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

/// A searchable card database
pub trait CardCatalog {
  /// Returns the cards matching `query`, in catalog order
  fn search(&self, query: &str) -> Result<Vec<Card>, CatalogError>;
  /// Returns the card named exactly `name`, or None if there is no such card
  fn lookup_exact(&self, name: &str) -> Result<Option<Card>, CatalogError>;
}

impl<'a, C: CardCatalog + ?Sized> CardCatalog for &'a C {
  fn search(&self, query: &str) -> Result<Vec<Card>, CatalogError> {
    (**self).search(query)
  }

  fn lookup_exact(&self, name: &str) -> Result<Option<Card>, CatalogError> {
    (**self).lookup_exact(name)
  }
}

/// A mana value comparison
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CmcFilter {
  AtMost(u8),
  AtLeast(u8),
}

impl fmt::Display for CmcFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::AtMost(n) => write!(f, "cmc<={}", n),
      Self::AtLeast(n) => write!(f, "cmc>={}", n),
    }
  }
}

/// A conjunctive catalog search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
  /// Card types, any of which may match
  pub types: Vec<&'static str>,
  /// Restricts the color identity to these colors
  pub identity: Vec<Color>,
  pub cmc: Option<CmcFilter>,
}

impl Query {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn of_type(mut self, kind: &'static str) -> Self {
    self.types.push(kind);
    self
  }

  pub fn within(mut self, colors: &[Color]) -> Self {
    self.identity = colors.to_vec();
    self
  }

  pub fn cmc(mut self, filter: CmcFilter) -> Self {
    self.cmc = Some(filter);
    self
  }
}

impl fmt::Display for Query {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut terms: Vec<String> = Vec::with_capacity(3);
    match self.types.len() {
      0 => {}
      1 => terms.push(format!("type:{}", self.types[0])),
      _ => {
        let alternatives: Vec<_> = self.types.iter().map(|t| format!("type:{}", t)).collect();
        terms.push(format!("({})", alternatives.join(" or ")));
      }
    }
    if !self.identity.is_empty() {
      let letters: String = self
        .identity
        .iter()
        .map(|c| c.symbol().to_ascii_lowercase())
        .collect();
      terms.push(format!("id<={}", letters));
    }
    if let Some(cmc) = self.cmc {
      terms.push(cmc.to_string());
    }
    write!(f, "{}", terms.join(" "))
  }
}

/// StaticCatalog answers searches from a fixed table of query strings.
/// Unknown queries return no cards.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
  results: HashMap<String, Vec<Card>>,
  cards: HashMap<String, Card>,
}

impl StaticCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers the result list of `query`. Every card also becomes
  /// available to `lookup_exact`.
  pub fn with_results(mut self, query: &str, cards: Vec<Card>) -> Self {
    for card in &cards {
      self.cards.insert(card.name.to_lowercase(), card.clone());
    }
    self.results.insert(query.to_string(), cards);
    self
  }

  pub fn with_card(mut self, card: Card) -> Self {
    self.cards.insert(card.name.to_lowercase(), card);
    self
  }
}

impl CardCatalog for StaticCatalog {
  fn search(&self, query: &str) -> Result<Vec<Card>, CatalogError> {
    Ok(self.results.get(query).cloned().unwrap_or_default())
  }

  fn lookup_exact(&self, name: &str) -> Result<Option<Card>, CatalogError> {
    Ok(self.cards.get(&name.to_lowercase()).cloned())
  }
}

/// CachedCatalog keeps every card it has seen, keyed by lowercase name,
/// and answers exact lookups from that cache before asking `inner`.
#[derive(Debug)]
pub struct CachedCatalog<C> {
  inner: C,
  cache: RefCell<HashMap<String, Card>>,
}

impl<C: CardCatalog> CachedCatalog<C> {
  pub fn new(inner: C) -> Self {
    Self {
      inner,
      cache: RefCell::new(HashMap::new()),
    }
  }

  /// Returns a cached card without consulting the inner catalog
  pub fn cached(&self, name: &str) -> Option<Card> {
    self.cache.borrow().get(&name.to_lowercase()).cloned()
  }

  pub fn len(&self) -> usize {
    self.cache.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn remember(&self, card: &Card) {
    self
      .cache
      .borrow_mut()
      .insert(card.name.to_lowercase(), card.clone());
  }

  /// Loads a gzip compressed bincode card cache written by `save`.
  /// A missing file leaves the cache untouched.
  pub fn load(&self, path: &Path) -> Result<usize, StoreError> {
    if !path.is_file() {
      return Ok(0);
    }
    let mut gz = GzDecoder::new(File::open(path)?);
    let mut bytes = Vec::new();
    gz.read_to_end(&mut bytes)?;
    let cards: Vec<Card> = bincode::deserialize(&bytes)?;
    let loaded = cards.len();
    for card in &cards {
      self.remember(card);
    }
    debug!("Loaded {} cached cards from {}", loaded, path.display());
    Ok(loaded)
  }

  /// Writes the card cache as gzip compressed bincode
  pub fn save(&self, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    let mut cards: Vec<Card> = self.cache.borrow().values().cloned().collect();
    cards.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let encoded = bincode::serialize(&cards)?;
    let mut e = GzEncoder::new(File::create(path)?, Compression::default());
    e.write_all(&encoded[..])?;
    e.finish()?;
    debug!("Saved {} cached cards to {}", cards.len(), path.display());
    Ok(())
  }
}

impl<C: CardCatalog> CardCatalog for CachedCatalog<C> {
  fn search(&self, query: &str) -> Result<Vec<Card>, CatalogError> {
    let cards = self.inner.search(query)?;
    for card in &cards {
      self.remember(card);
    }
    Ok(cards)
  }

  fn lookup_exact(&self, name: &str) -> Result<Option<Card>, CatalogError> {
    if let Some(card) = self.cached(name) {
      return Ok(Some(card));
    }
    let card = self.inner.lookup_exact(name)?;
    if let Some(card) = &card {
      self.remember(card);
    }
    Ok(card)
  }
}
