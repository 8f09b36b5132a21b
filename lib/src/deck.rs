use crate::error::{DecklistError, InputError};
use regex::Regex;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// CardCounts is a multiset of card names. A name is either absent or
/// present with a quantity of at least 1; zero quantities are never stored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, usize>", into = "BTreeMap<String, usize>")]
pub struct CardCounts {
  counts: BTreeMap<String, usize>,
}

impl CardCounts {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds `count` copies of `name`. Adding zero copies does nothing.
  pub fn add(&mut self, name: &str, count: usize) {
    if count == 0 {
      return;
    }
    *self.counts.entry(name.to_string()).or_insert(0) += count;
  }

  /// Removes up to `count` copies of `name` and returns how many were removed.
  /// The entry disappears once its quantity reaches zero.
  pub fn remove(&mut self, name: &str, count: usize) -> usize {
    let held = match self.counts.get_mut(name) {
      None => return 0,
      Some(qty) if *qty > count => {
        *qty -= count;
        return count;
      }
      Some(qty) => *qty,
    };
    self.counts.remove(name);
    held
  }

  pub fn count(&self, name: &str) -> usize {
    self.counts.get(name).copied().unwrap_or(0)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.counts.contains_key(name)
  }

  /// Returns the sum of all quantities
  pub fn total(&self) -> usize {
    self.counts.values().sum()
  }

  /// Returns the number of distinct names
  pub fn len(&self) -> usize {
    self.counts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  /// Iterates over (name, quantity) pairs in name order
  pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
    self.counts.iter().map(|(name, qty)| (name.as_str(), *qty))
  }

  /// Returns one entry per physical card
  pub fn flatten(&self) -> Vec<&str> {
    let mut result = Vec::with_capacity(self.total());
    for (name, qty) in self.iter() {
      for _ in 0..qty {
        result.push(name);
      }
    }
    result
  }
}

impl From<BTreeMap<String, usize>> for CardCounts {
  fn from(mut counts: BTreeMap<String, usize>) -> Self {
    counts.retain(|_, qty| *qty > 0);
    Self { counts }
  }
}

impl From<CardCounts> for BTreeMap<String, usize> {
  fn from(counts: CardCounts) -> Self {
    counts.counts
  }
}

impl<'a> IntoIterator for &'a CardCounts {
  type Item = (&'a String, &'a usize);
  type IntoIter = btree_map::Iter<'a, String, usize>;

  fn into_iter(self) -> Self::IntoIter {
    self.counts.iter()
  }
}

/// Deck names are file names in the deck store, so blank names are refused
pub fn validate_deck_name(name: &str) -> Result<(), InputError> {
  if name.trim().is_empty() {
    return Err(InputError::EmptyDeckName);
  }
  Ok(())
}

/// A named multiset of cards
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
  pub name: String,
  pub cards: CardCounts,
}

impl Deck {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      cards: CardCounts::new(),
    }
  }

  pub fn add_card(&mut self, name: &str, count: usize) {
    self.cards.add(name, count);
  }

  pub fn remove_card(&mut self, name: &str, count: usize) -> usize {
    self.cards.remove(name, count)
  }

  /// Returns the number of physical cards in the deck
  pub fn total_cards(&self) -> usize {
    self.cards.total()
  }

  /// Returns the entries that hold more than one copy of a card that is
  /// not a land, as reported by `is_land`
  pub fn duplicate_nonlands<F>(&self, is_land: F) -> Vec<(&str, usize)>
  where
    F: Fn(&str) -> bool,
  {
    self
      .cards
      .iter()
      .filter(|(name, qty)| *qty > 1 && !is_land(*name))
      .collect()
  }

  /// Parses a deck list such as
  ///
  /// ```text
  /// Deck
  /// 4 Lightning Bolt (M10) 146
  /// 20 Mountain
  ///
  /// Sideboard
  /// 2 Smash to Smithereens
  /// ```
  ///
  /// Only the main deck is kept.
  pub fn from_list(name: &str, list: &str) -> Result<Self, DecklistError> {
    lazy_static! {
      static ref LINE_REGEX: Regex = Regex::new(concat!(
        r"^(?P<amount>\d+)x?\s+(?P<name>[^\(#]+?)\s*",
        r"(?:\((?P<set>\w+)\)\s*(?P<setnum>\S+)?)?\s*(?:#.*)?$"
      ))
      .expect("Failed to compile LINE_REGEX regex");
    }
    let mut deck = Self::new(name);
    let mut read_card = false;
    for (idx, line) in list.lines().enumerate() {
      let trimmed = line.trim();
      let lower = trimmed.to_lowercase();
      if trimmed.is_empty() && !read_card {
        continue;
      }
      // An empty line divides the main deck from the sideboard
      if trimmed.is_empty() || lower == "sideboard" {
        break;
      }
      if lower == "deck" || trimmed.starts_with('#') {
        continue;
      }
      let caps = LINE_REGEX.captures(trimmed).ok_or_else(|| DecklistError {
        line: idx + 1,
        reason: format!("expected \"<count> <card name>\", got \"{}\"", trimmed),
      })?;
      let amount = caps["amount"].parse::<usize>().map_err(|_| DecklistError {
        line: idx + 1,
        reason: format!("cannot parse card count \"{}\"", &caps["amount"]),
      })?;
      deck.add_card(caps["name"].trim(), amount);
      read_card = true;
    }
    Ok(deck)
  }

  /// Renders the deck as a list readable by `from_list`
  pub fn to_list(&self) -> String {
    let mut out = String::with_capacity(self.cards.len() * 24);
    for (name, qty) in self.cards.iter() {
      out.push_str(&format!("{} {}\n", qty, name));
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use crate::deck::*;
  use crate::error::InputError;

  #[test]
  fn add_accumulates() {
    let mut counts = CardCounts::new();
    counts.add("Shock", 2);
    counts.add("Shock", 1);
    assert_eq!(counts.count("Shock"), 3);
    assert_eq!(counts.total(), 3);
    assert_eq!(counts.len(), 1);
  }

  #[test]
  fn add_zero_is_a_no_op() {
    let mut counts = CardCounts::new();
    counts.add("Shock", 0);
    assert!(counts.is_empty());
    assert!(!counts.contains("Shock"));
  }

  #[test]
  fn remove_to_zero_drops_the_entry() {
    let mut counts = CardCounts::new();
    counts.add("Shock", 3);
    assert_eq!(counts.remove("Shock", 1), 1);
    assert_eq!(counts.count("Shock"), 2);
    assert_eq!(counts.remove("Shock", 5), 2);
    assert!(!counts.contains("Shock"));
    assert_eq!(counts.remove("Shock", 1), 0);
    assert_eq!(counts.remove("Opt", 1), 0);
  }

  #[test]
  fn flatten_one_entry_per_copy() {
    let mut counts = CardCounts::new();
    counts.add("Mountain", 3);
    counts.add("Shock", 1);
    assert_eq!(counts.flatten(), vec!["Mountain", "Mountain", "Mountain", "Shock"]);
  }

  #[test]
  fn deserialize_discards_zero_quantities() {
    let deck: Deck =
      serde_json::from_str(r#"{ "name": "Burn", "cards": { "Shock": 4, "Opt": 0 } }"#).unwrap();
    assert_eq!(deck.cards.len(), 1);
    assert!(!deck.cards.contains("Opt"));
  }

  #[test]
  fn json_round_trip() {
    let mut deck = Deck::new("Burn");
    deck.add_card("Mountain", 20);
    deck.add_card("Lightning Bolt", 4);
    let json = serde_json::to_string(&deck).unwrap();
    assert_eq!(
      json,
      r#"{"name":"Burn","cards":{"Lightning Bolt":4,"Mountain":20}}"#
    );
    let back: Deck = serde_json::from_str(&json).unwrap();
    assert_eq!(back, deck);
  }

  #[test]
  fn duplicate_nonlands_ignores_lands_and_singletons() {
    let mut deck = Deck::new("Gruul");
    deck.add_card("Forest", 12);
    deck.add_card("Llanowar Elves", 4);
    deck.add_card("Giant Growth", 1);
    let flagged = deck.duplicate_nonlands(|name| name == "Forest");
    assert_eq!(flagged, vec![("Llanowar Elves", 4)]);
  }

  #[test]
  fn from_list_main_deck_only() {
    let list = "
      Deck
      # burn
      4 Lightning Bolt (M10) 146
      4x Shock
      20 Mountain

      Sideboard
      2 Smash to Smithereens
      ";
    let deck = Deck::from_list("Burn", list).unwrap();
    assert_eq!(deck.total_cards(), 28);
    assert_eq!(deck.cards.count("Lightning Bolt"), 4);
    assert_eq!(deck.cards.count("Shock"), 4);
    assert!(!deck.cards.contains("Smash to Smithereens"));
  }

  #[test]
  fn from_list_zero_count_is_absent() {
    let deck = Deck::from_list("Mono U", "0 Island\n4 Opt").unwrap();
    assert!(!deck.cards.contains("Island"));
    assert_eq!(deck.total_cards(), 4);
  }

  #[test]
  fn from_list_reports_bad_line() {
    let err = Deck::from_list("Bad", "4 Shock\nShock").unwrap_err();
    assert_eq!(err.line, 2);
  }

  #[test]
  fn from_list_counts_leading_blank_lines() {
    let err = Deck::from_list("Bad", "\n\n4 Shock\nShock").unwrap_err();
    assert_eq!(err.line, 4);
    let err = Deck::from_list("Bad", "\n  \nDeck\n\nnonsense").unwrap_err();
    assert_eq!(err.line, 5);
  }

  #[test]
  fn from_list_blank_line_after_cards_ends_main_deck() {
    let deck = Deck::from_list("Burn", "\n\n4 Shock\n\n2 Opt").unwrap();
    assert_eq!(deck.total_cards(), 4);
    assert!(!deck.cards.contains("Opt"));
  }

  #[test]
  fn blank_deck_names_are_invalid() {
    assert_eq!(validate_deck_name(""), Err(InputError::EmptyDeckName));
    assert_eq!(validate_deck_name(" \t"), Err(InputError::EmptyDeckName));
    assert_eq!(validate_deck_name("Burn"), Ok(()));
  }

  #[test]
  fn to_list_reads_back() {
    let mut deck = Deck::new("Burn");
    deck.add_card("Mountain", 20);
    deck.add_card("Lightning Bolt", 4);
    assert_eq!(deck.to_list(), "4 Lightning Bolt\n20 Mountain\n");
    assert_eq!(Deck::from_list("Burn", &deck.to_list()).unwrap(), deck);
  }
}
