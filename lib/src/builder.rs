//! # Deck auto-builder
//!
//! Builds a 60 card deck for a color identity and an archetype: 24 basic
//! lands split across the colors, then creatures and instants/sorceries from
//! catalog searches, then cheap creatures of any color if the deck is still
//! short. A card name is only ever added once, with quantity 1, apart from
//! the basic lands.
use crate::archetype::{deck_label, Archetype, DECK_SIZE, LAND_COUNT};
use crate::card::{validate_colors, Card, Color, ColorSet};
use crate::catalog::{CardCatalog, CmcFilter, Query};
use crate::deck::Deck;
use crate::error::InputError;
use std::collections::HashSet;

/// Mana value ceiling of the gap filling creature search
const FALLBACK_CMC: u8 = 2;

/// Splits `land_count` lands as evenly as possible across `colors`.
/// The first `land_count % colors.len()` colors get one extra land.
pub fn allocate_lands(colors: &[Color], land_count: usize) -> Vec<(Color, usize)> {
  if colors.is_empty() {
    return Vec::new();
  }
  let base = land_count / colors.len();
  let remainder = land_count % colors.len();
  colors
    .iter()
    .enumerate()
    .map(|(i, &color)| (color, if i < remainder { base + 1 } else { base }))
    .collect()
}

pub fn creature_query(colors: &[Color], archetype: Archetype) -> Query {
  Query::new()
    .of_type("creature")
    .within(colors)
    .cmc(archetype.creature_cmc())
}

pub fn spell_query(colors: &[Color], archetype: Archetype) -> Query {
  Query::new()
    .of_type("instant")
    .of_type("sorcery")
    .within(colors)
    .cmc(archetype.spell_cmc())
}

/// Cheap creatures of any color
pub fn fallback_query() -> Query {
  Query::new()
    .of_type("creature")
    .cmc(CmcFilter::AtMost(FALLBACK_CMC))
}

/// The card names already placed in a deck under construction
#[derive(Debug, Default, Clone)]
pub struct UsedNames {
  names: HashSet<String>,
}

impl UsedNames {
  pub fn new() -> Self {
    Self::default()
  }

  /// Marks `name` as used. Returns false if it already was.
  pub fn insert(&mut self, name: &str) -> bool {
    self.names.insert(name.to_string())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.contains(name)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

/// Adds the allocated basic lands, one entry per color
pub fn add_basic_lands(deck: &mut Deck, used: &mut UsedNames, colors: &[Color], land_count: usize) {
  for (color, count) in allocate_lands(colors, land_count) {
    deck.add_card(color.basic_land(), count);
    used.insert(color.basic_land());
  }
}

/// Adds one copy of each unused candidate, in order, until `limit` names
/// were added or the candidates run out. Returns the number of names added.
pub fn add_distinct<'a, I>(
  deck: &mut Deck,
  used: &mut UsedNames,
  candidates: I,
  limit: usize,
) -> usize
where
  I: IntoIterator<Item = &'a Card>,
{
  let mut added = 0;
  for card in candidates {
    if added >= limit {
      break;
    }
    if used.insert(&card.name) {
      deck.add_card(&card.name, 1);
      added += 1;
    }
  }
  added
}

/// Adds one copy of each unused candidate until the deck holds `total` cards.
/// Returns the number of names added.
pub fn pad_to<'a, I>(deck: &mut Deck, used: &mut UsedNames, candidates: I, total: usize) -> usize
where
  I: IntoIterator<Item = &'a Card>,
{
  let mut added = 0;
  for card in candidates {
    if deck.total_cards() >= total {
      break;
    }
    if used.insert(&card.name) {
      deck.add_card(&card.name, 1);
      added += 1;
    }
  }
  added
}

/// Cards the builder may pick as nonland slots
fn is_pickable(card: &Card) -> bool {
  !card.is_land() && !card.is_token()
}

pub struct AutoBuilder<C> {
  catalog: C,
}

impl<C: CardCatalog> AutoBuilder<C> {
  pub fn new(catalog: C) -> Self {
    Self { catalog }
  }

  /// Returns the search results of `query`. A failing search yields no cards.
  fn candidates(&self, query: &Query) -> Vec<Card> {
    let query = query.to_string();
    match self.catalog.search(&query) {
      Ok(cards) => {
        debug!("\"{}\" returned {} cards", query, cards.len());
        cards
      }
      Err(e) => {
        warn!("Search \"{}\" failed, continuing without it: {}", query, e);
        Vec::new()
      }
    }
  }

  /// Builds a deck named after `archetype` and `colors`. The deck holds fewer
  /// than 60 cards when the catalog runs out of candidates.
  pub fn build(&self, colors: &[Color], archetype: Archetype) -> Result<Deck, InputError> {
    validate_colors(colors)?;
    let mut deck = Deck::new(&deck_label(archetype, colors));
    let mut used = UsedNames::new();
    let identity: ColorSet = colors.iter().collect();
    let targets = archetype.targets();

    add_basic_lands(&mut deck, &mut used, colors, LAND_COUNT);

    let creatures = self.candidates(&creature_query(colors, archetype));
    let on_color = creatures
      .iter()
      .filter(|c| is_pickable(c) && c.colors.is_subset(identity));
    let creature_count = add_distinct(&mut deck, &mut used, on_color, targets.creatures);

    let spells = self.candidates(&spell_query(colors, archetype));
    let on_color = spells
      .iter()
      .filter(|c| is_pickable(c) && c.colors.is_subset(identity));
    let spell_count = add_distinct(&mut deck, &mut used, on_color, targets.spells);

    info!(
      "{}: {} of {} creatures, {} of {} spells",
      deck.name, creature_count, targets.creatures, spell_count, targets.spells
    );

    if deck.total_cards() < DECK_SIZE {
      let fallback = self.candidates(&fallback_query());
      let padded = pad_to(
        &mut deck,
        &mut used,
        fallback.iter().filter(|c| is_pickable(c)),
        DECK_SIZE,
      );
      info!("{}: padded with {} cheap creatures", deck.name, padded);
    }

    if deck.total_cards() < DECK_SIZE {
      warn!(
        "{} has only {} of {} cards, the catalog ran out of candidates",
        deck.name,
        deck.total_cards(),
        DECK_SIZE
      );
    }
    Ok(deck)
  }
}

#[cfg(test)]
mod tests {
  use crate::archetype::*;
  use crate::builder::*;
  use crate::card::*;
  use crate::catalog::StaticCatalog;
  use crate::error::CatalogError;

  const RG: [Color; 2] = [Color::Red, Color::Green];

  fn card(name: &str, type_line: &str, colors: &[Color]) -> Card {
    Card {
      type_line: type_line.to_string(),
      colors: colors.iter().collect(),
      ..Card::named(name)
    }
  }

  fn creatures(prefix: &str, n: usize, colors: &[Color]) -> Vec<Card> {
    (0..n)
      .map(|i| card(&format!("{} {}", prefix, i), "Creature — Beast", colors))
      .collect()
  }

  fn spells(prefix: &str, n: usize, colors: &[Color]) -> Vec<Card> {
    (0..n)
      .map(|i| card(&format!("{} {}", prefix, i), "Instant", colors))
      .collect()
  }

  struct BrokenCatalog;

  impl CardCatalog for BrokenCatalog {
    fn search(&self, _query: &str) -> Result<Vec<Card>, CatalogError> {
      Err(CatalogError::Transport("connection refused".to_string()))
    }

    fn lookup_exact(&self, _name: &str) -> Result<Option<Card>, CatalogError> {
      Err(CatalogError::Transport("connection refused".to_string()))
    }
  }

  #[test]
  fn allocate_two_colors() {
    assert_eq!(
      allocate_lands(&RG, 24),
      vec![(Color::Red, 12), (Color::Green, 12)]
    );
  }

  #[test]
  fn allocate_three_colors() {
    let wub = [Color::White, Color::Blue, Color::Black];
    let counts: Vec<_> = allocate_lands(&wub, 24).into_iter().map(|(_, n)| n).collect();
    assert_eq!(counts, vec![8, 8, 8]);
  }

  #[test]
  fn allocate_remainder_goes_to_the_first_colors() {
    let rgb = [Color::Red, Color::Green, Color::Black];
    assert_eq!(
      allocate_lands(&rgb, 25),
      vec![(Color::Red, 9), (Color::Green, 8), (Color::Black, 8)]
    );
    assert_eq!(
      allocate_lands(&rgb, 26),
      vec![(Color::Red, 9), (Color::Green, 9), (Color::Black, 8)]
    );
  }

  #[test]
  fn mono_color_gets_every_land() {
    assert_eq!(allocate_lands(&[Color::Blue], 24), vec![(Color::Blue, 24)]);
  }

  #[test]
  fn build_full_aggro_deck() {
    let catalog = StaticCatalog::new()
      .with_results(
        &creature_query(&RG, Archetype::Aggro).to_string(),
        creatures("Beast", 30, &RG),
      )
      .with_results(
        &spell_query(&RG, Archetype::Aggro).to_string(),
        spells("Burn", 20, &[Color::Red]),
      );
    let deck = AutoBuilder::new(&catalog).build(&RG, Archetype::Aggro).unwrap();
    assert_eq!(deck.name, "Aggro R/G Auto");
    assert_eq!(deck.total_cards(), 60);
    assert_eq!(deck.cards.count("Mountain"), 12);
    assert_eq!(deck.cards.count("Forest"), 12);
    assert!(deck.cards.contains("Beast 23"));
    assert!(!deck.cards.contains("Beast 24"));
    assert!(deck.cards.contains("Burn 11"));
    assert!(!deck.cards.contains("Burn 12"));
    assert!(deck
      .cards
      .iter()
      .all(|(name, qty)| qty == 1 || name == "Mountain" || name == "Forest"));
  }

  #[test]
  fn build_control_name_and_lands() {
    let ub = [Color::Blue, Color::Black];
    let deck = AutoBuilder::new(StaticCatalog::new())
      .build(&ub, Archetype::Control)
      .unwrap();
    assert_eq!(deck.name, "Control U/B Auto");
    assert_eq!(deck.cards.count("Island"), 12);
    assert_eq!(deck.cards.count("Swamp"), 12);
  }

  #[test]
  fn off_color_candidates_are_filtered() {
    let mut candidates = vec![card("Serra Angel", "Creature — Angel", &[Color::White])];
    candidates.push(card("Ornithopter", "Artifact Creature — Thopter", &[]));
    candidates.push(card("Gruul Spellbreaker", "Creature — Ogre", &RG));
    let catalog = StaticCatalog::new()
      .with_results(&creature_query(&RG, Archetype::Midrange).to_string(), candidates);
    let deck = AutoBuilder::new(&catalog).build(&RG, Archetype::Midrange).unwrap();
    assert!(!deck.cards.contains("Serra Angel"));
    assert!(deck.cards.contains("Ornithopter"));
    assert!(deck.cards.contains("Gruul Spellbreaker"));
  }

  #[test]
  fn used_names_are_never_added_twice() {
    let shared = card("Fire // Ice", "Instant // Instant", &[Color::Red]);
    let mut creature_results = vec![card("Forest", "Creature — Treefolk", &[Color::Green])];
    creature_results.push(shared.clone());
    creature_results.push(card("Goblin Guide", "Creature — Goblin", &[Color::Red]));
    creature_results.push(card("Goblin Guide", "Creature — Goblin", &[Color::Red]));
    let catalog = StaticCatalog::new()
      .with_results(&creature_query(&RG, Archetype::Aggro).to_string(), creature_results)
      .with_results(&spell_query(&RG, Archetype::Aggro).to_string(), vec![shared]);
    let deck = AutoBuilder::new(&catalog).build(&RG, Archetype::Aggro).unwrap();
    assert_eq!(deck.cards.count("Forest"), 12);
    assert_eq!(deck.cards.count("Fire // Ice"), 1);
    assert_eq!(deck.cards.count("Goblin Guide"), 1);
    assert_eq!(deck.total_cards(), 26);
  }

  #[test]
  fn tokens_and_lands_are_not_picked() {
    let candidates = vec![
      card("Goblin", "Token Creature — Goblin", &[Color::Red]),
      card("Dryad Arbor", "Land Creature — Forest Dryad", &[Color::Green]),
    ];
    let catalog = StaticCatalog::new()
      .with_results(&creature_query(&RG, Archetype::Aggro).to_string(), candidates);
    let deck = AutoBuilder::new(&catalog).build(&RG, Archetype::Aggro).unwrap();
    assert_eq!(deck.total_cards(), 24);
  }

  #[test]
  fn empty_catalog_returns_lands_only() {
    let deck = AutoBuilder::new(StaticCatalog::new())
      .build(&RG, Archetype::Aggro)
      .unwrap();
    assert_eq!(deck.total_cards(), 24);
    assert_eq!(deck.cards.len(), 2);
  }

  #[test]
  fn failing_catalog_degrades_to_lands_only() {
    let deck = AutoBuilder::new(BrokenCatalog)
      .build(&[Color::Black], Archetype::Control)
      .unwrap();
    assert_eq!(deck.name, "Control B Auto");
    assert_eq!(deck.cards.count("Swamp"), 24);
    assert_eq!(deck.total_cards(), 24);
  }

  #[test]
  fn fallback_pads_to_exactly_60() {
    let catalog = StaticCatalog::new()
      .with_results(
        &creature_query(&RG, Archetype::Midrange).to_string(),
        creatures("Beast", 10, &RG),
      )
      .with_results(
        &spell_query(&RG, Archetype::Midrange).to_string(),
        spells("Burn", 5, &[Color::Red]),
      )
      .with_results(
        &fallback_query().to_string(),
        creatures("Drake", 40, &[Color::Blue]),
      );
    let deck = AutoBuilder::new(&catalog).build(&RG, Archetype::Midrange).unwrap();
    assert_eq!(deck.total_cards(), 60);
    // 24 lands + 10 + 5 leaves 21 slots for off-color fillers
    assert!(deck.cards.contains("Drake 20"));
    assert!(!deck.cards.contains("Drake 21"));
  }

  #[test]
  fn fallback_skips_used_names() {
    let beasts = creatures("Beast", 10, &RG);
    let catalog = StaticCatalog::new()
      .with_results(
        &creature_query(&RG, Archetype::Aggro).to_string(),
        beasts.clone(),
      )
      .with_results(&fallback_query().to_string(), beasts);
    let deck = AutoBuilder::new(&catalog).build(&RG, Archetype::Aggro).unwrap();
    assert_eq!(deck.total_cards(), 34);
  }

  #[test]
  fn invalid_color_count_fails_fast() {
    let builder = AutoBuilder::new(StaticCatalog::new());
    assert_eq!(
      builder.build(&[], Archetype::Aggro),
      Err(InputError::ColorCount(0))
    );
    let four = [Color::White, Color::Blue, Color::Black, Color::Red];
    assert_eq!(
      builder.build(&four, Archetype::Aggro),
      Err(InputError::ColorCount(4))
    );
    assert_eq!(
      builder.build(&[Color::Red, Color::Red], Archetype::Aggro),
      Err(InputError::DuplicateColor(Color::Red))
    );
  }

  #[test]
  fn add_distinct_respects_limit() {
    let mut deck = Deck::new("t");
    let mut used = UsedNames::new();
    let pool = creatures("Beast", 5, &RG);
    assert_eq!(add_distinct(&mut deck, &mut used, &pool, 3), 3);
    assert_eq!(add_distinct(&mut deck, &mut used, &pool, 3), 2);
    assert_eq!(deck.total_cards(), 5);
    assert_eq!(used.len(), 5);
  }
}
