//! # Scryfall API objects
//!
//! Serde models of the [Scryfall](https://scryfall.com/docs/api) card, list
//! and error objects, plus the conversion into the internal `Card`.
use crate::card::{Card, Color, ColorSet};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryfallCard {
  #[serde(default)]
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub mana_cost: Option<String>,
  #[serde(default)]
  pub oracle_text: Option<String>,
  #[serde(default)]
  pub type_line: String,
  #[serde(default)]
  pub colors: Vec<Color>,
  #[serde(default)]
  pub image_uris: HashMap<String, String>,
  #[serde(default)]
  pub cmc: f32,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub card_faces: Vec<ScryfallCard>,
  #[serde(default)]
  pub set_name: String,
  #[serde(default)]
  pub rarity: Rarity,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialOrd, PartialEq, Eq, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
  Common,
  Uncommon,
  Rare,
  Special,
  Mythic,
  Bonus,
  #[serde(other)]
  Unknown,
}

impl Default for Rarity {
  fn default() -> Self {
    Self::Unknown
  }
}

/// A page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
  #[serde(default)]
  pub total_cards: usize,
  #[serde(default)]
  pub has_more: bool,
  #[serde(default)]
  pub next_page: Option<String>,
  #[serde(default)]
  pub data: Vec<ScryfallCard>,
}

/// The object returned with every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
  #[serde(default)]
  pub status: u16,
  #[serde(default)]
  pub code: String,
  #[serde(default)]
  pub details: String,
}

impl From<ScryfallCard> for Card {
  fn from(card: ScryfallCard) -> Self {
    // Multi-faced cards keep their colors and images on the faces
    let first_face = card.card_faces.first();
    let colors: ColorSet = if card.colors.is_empty() {
      first_face
        .map(|face| face.colors.iter().collect())
        .unwrap_or_default()
    } else {
      card.colors.iter().collect()
    };
    let image_uri = card
      .image_uris
      .get("normal")
      .or_else(|| first_face.and_then(|face| face.image_uris.get("normal")))
      .cloned();
    let mana_cost = card
      .mana_cost
      .clone()
      .or_else(|| first_face.and_then(|face| face.mana_cost.clone()));
    Card {
      id: card.id,
      name: card.name.trim().to_string(),
      mana_cost,
      type_line: card.type_line,
      oracle_text: card.oracle_text,
      set_name: card.set_name,
      rarity: card.rarity,
      image_uri,
      colors,
      cmc: card.cmc,
    }
  }
}
