//! # Collection
//!
use crate::deck::CardCounts;
use std::ops::{Deref, DerefMut};

/// A Collection represents every card the player owns
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
  pub cards: CardCounts,
}

impl Collection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the (name, quantity) pairs ordered by case-insensitive name
  pub fn sorted(&self) -> Vec<(&str, usize)> {
    let mut entries: Vec<_> = self.cards.iter().collect();
    entries.sort_by_cached_key(|(name, _)| name.to_lowercase());
    entries
  }
}

impl From<CardCounts> for Collection {
  fn from(cards: CardCounts) -> Self {
    Self { cards }
  }
}

impl Deref for Collection {
  type Target = CardCounts;

  fn deref(&self) -> &Self::Target {
    &self.cards
  }
}

impl DerefMut for Collection {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.cards
  }
}
