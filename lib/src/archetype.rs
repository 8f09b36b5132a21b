//! # Deck archetypes
//!
//! An archetype fixes how many creature and noncreature slots an
//! auto-built deck has and which mana values its card searches accept.
//! Auto-built decks are labelled "<Archetype> <C/C> Auto"; the match history
//! recommender finds them again through that label.
use crate::card::Color;
use crate::catalog::CmcFilter;
use crate::error::InputError;
use std::fmt;
use std::str::FromStr;

/// Number of basic lands in an auto-built deck
pub const LAND_COUNT: usize = 24;
/// Number of creature and noncreature spell slots in an auto-built deck
pub const NONLAND_COUNT: usize = 36;
/// Target size of an auto-built deck
pub const DECK_SIZE: usize = LAND_COUNT + NONLAND_COUNT;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
  Aggro,
  Midrange,
  Control,
}

/// Nonland slot counts
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Targets {
  pub creatures: usize,
  pub spells: usize,
}

impl Archetype {
  /// All archetypes, in the order the recommender evaluates them
  pub const ALL: [Archetype; 3] = [Archetype::Aggro, Archetype::Midrange, Archetype::Control];

  pub fn name(self) -> &'static str {
    match self {
      Self::Aggro => "Aggro",
      Self::Midrange => "Midrange",
      Self::Control => "Control",
    }
  }

  pub fn targets(self) -> Targets {
    match self {
      Self::Aggro => Targets {
        creatures: 24,
        spells: 12,
      },
      Self::Midrange => Targets {
        creatures: 18,
        spells: 18,
      },
      Self::Control => Targets {
        creatures: 12,
        spells: 24,
      },
    }
  }

  /// Mana value filter for the creature search
  pub fn creature_cmc(self) -> CmcFilter {
    match self {
      Self::Aggro => CmcFilter::AtMost(3),
      Self::Midrange => CmcFilter::AtMost(4),
      Self::Control => CmcFilter::AtMost(5),
    }
  }

  /// Mana value filter for the instant and sorcery search.
  /// Control looks for expensive spells rather than cheap ones.
  pub fn spell_cmc(self) -> CmcFilter {
    match self {
      Self::Aggro => CmcFilter::AtMost(3),
      Self::Midrange => CmcFilter::AtMost(4),
      Self::Control => CmcFilter::AtLeast(3),
    }
  }
}

impl fmt::Display for Archetype {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

impl FromStr for Archetype {
  type Err = InputError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "aggro" => Ok(Self::Aggro),
      "midrange" => Ok(Self::Midrange),
      "control" => Ok(Self::Control),
      _ => Err(InputError::InvalidArchetype(s.to_string())),
    }
  }
}

/// Returns the colors joined by '/', in the order given
pub fn color_combo(colors: &[Color]) -> String {
  let symbols: Vec<_> = colors.iter().map(|c| c.symbol().to_string()).collect();
  symbols.join("/")
}

/// Returns the name of an auto-built deck, e.g. "Control U/B Auto"
pub fn deck_label(archetype: Archetype, colors: &[Color]) -> String {
  format!("{} {} Auto", archetype, color_combo(colors))
}

/// Returns true if a deck label belongs to `archetype` and mentions `combo`
pub fn label_matches(label: &str, archetype: Archetype, combo: &str) -> bool {
  label.starts_with(archetype.name()) && label.contains(combo)
}

#[cfg(test)]
mod tests {
  use crate::archetype::*;

  #[test]
  fn every_archetype_fills_36_nonland_slots() {
    for archetype in Archetype::ALL.iter() {
      let t = archetype.targets();
      assert_eq!(t.creatures + t.spells, NONLAND_COUNT);
    }
    assert_eq!(DECK_SIZE, 60);
  }

  #[test]
  fn parse_is_case_insensitive() {
    assert_eq!("CONTROL".parse::<Archetype>(), Ok(Archetype::Control));
    assert_eq!(" aggro ".parse::<Archetype>(), Ok(Archetype::Aggro));
    assert_eq!(
      "tempo".parse::<Archetype>(),
      Err(InputError::InvalidArchetype("tempo".to_string()))
    );
  }

  #[test]
  fn control_deck_label() {
    let label = deck_label(Archetype::Control, &[Color::Blue, Color::Black]);
    assert_eq!(label, "Control U/B Auto");
  }

  #[test]
  fn label_matching() {
    let label = deck_label(Archetype::Aggro, &[Color::Red, Color::Green]);
    assert!(label_matches(&label, Archetype::Aggro, "R/G"));
    assert!(!label_matches(&label, Archetype::Midrange, "R/G"));
    assert!(!label_matches(&label, Archetype::Aggro, "G/R"));
  }

  #[test]
  fn control_spells_use_a_floor() {
    assert_eq!(Archetype::Control.spell_cmc(), CmcFilter::AtLeast(3));
    assert_eq!(Archetype::Control.creature_cmc(), CmcFilter::AtMost(5));
    assert_eq!(Archetype::Aggro.spell_cmc(), CmcFilter::AtMost(3));
  }
}
