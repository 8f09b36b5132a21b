//! # Internal card representation
//!
use crate::error::InputError;
use crate::scryfall::Rarity;
use std::fmt;
use std::str::FromStr;

/// Color represents one of the five [colors](https://mtg.gamepedia.com/Color)
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
  #[serde(rename = "W")]
  White,
  #[serde(rename = "U")]
  Blue,
  #[serde(rename = "B")]
  Black,
  #[serde(rename = "R")]
  Red,
  #[serde(rename = "G")]
  Green,
}

impl Color {
  /// All colors in WUBRG order
  pub const ALL: [Color; 5] = [
    Color::White,
    Color::Blue,
    Color::Black,
    Color::Red,
    Color::Green,
  ];

  /// Returns the one letter symbol of the color
  pub fn symbol(self) -> char {
    match self {
      Self::White => 'W',
      Self::Blue => 'U',
      Self::Black => 'B',
      Self::Red => 'R',
      Self::Green => 'G',
    }
  }

  /// Returns the name of the basic land that produces this color
  pub fn basic_land(self) -> &'static str {
    match self {
      Self::White => "Plains",
      Self::Blue => "Island",
      Self::Black => "Swamp",
      Self::Red => "Mountain",
      Self::Green => "Forest",
    }
  }

  pub fn from_symbol(symbol: char) -> Result<Self, InputError> {
    match symbol.to_ascii_uppercase() {
      'W' => Ok(Self::White),
      'U' => Ok(Self::Blue),
      'B' => Ok(Self::Black),
      'R' => Ok(Self::Red),
      'G' => Ok(Self::Green),
      _ => Err(InputError::InvalidColor(symbol.to_string())),
    }
  }

  #[inline]
  fn bit(self) -> u8 {
    match self {
      Self::White => 0b0000_0001,
      Self::Blue => 0b0000_0010,
      Self::Black => 0b0000_0100,
      Self::Red => 0b0000_1000,
      Self::Green => 0b0001_0000,
    }
  }
}

impl fmt::Display for Color {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.symbol())
  }
}

impl FromStr for Color {
  type Err = InputError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
      (Some(c), None) => Self::from_symbol(c),
      _ => Err(InputError::InvalidColor(s.to_string())),
    }
  }
}

/// Parses a user supplied color list such as "RG", "R/G", "r,g" or "R G".
/// The order of appearance is preserved.
pub fn parse_colors(text: &str) -> Result<Vec<Color>, InputError> {
  text
    .chars()
    .filter(|c| !c.is_whitespace() && *c != '/' && *c != ',')
    .map(Color::from_symbol)
    .collect()
}

/// Checks that a deck color identity lists 1 to 3 distinct colors
pub fn validate_colors(colors: &[Color]) -> Result<(), InputError> {
  if colors.is_empty() || colors.len() > 3 {
    return Err(InputError::ColorCount(colors.len()));
  }
  let mut seen = ColorSet::new();
  for &color in colors {
    if seen.contains(color) {
      return Err(InputError::DuplicateColor(color));
    }
    seen = seen.with(color);
  }
  Ok(())
}

/// ColorSet is a set of colors stored as a bit signature.
/// The empty set is colorless.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorSet {
  pub bits: u8,
}

impl ColorSet {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub fn with(self, color: Color) -> Self {
    Self {
      bits: self.bits | color.bit(),
    }
  }

  #[inline]
  pub fn contains(self, color: Color) -> bool {
    self.bits & color.bit() != 0
  }

  /// Returns true if every color of self is also in other
  #[inline]
  pub fn is_subset(self, other: ColorSet) -> bool {
    self.bits & !other.bits == 0
  }

  #[inline]
  pub fn is_colorless(self) -> bool {
    self.bits == 0
  }

  pub fn len(self) -> usize {
    self.bits.count_ones() as usize
  }

  pub fn is_empty(self) -> bool {
    self.is_colorless()
  }

  /// Returns the colors of the set in WUBRG order
  pub fn colors(self) -> Vec<Color> {
    Color::ALL
      .iter()
      .copied()
      .filter(|c| self.contains(*c))
      .collect()
  }
}

impl std::iter::FromIterator<Color> for ColorSet {
  fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
    iter.into_iter().fold(ColorSet::new(), ColorSet::with)
  }
}

impl<'a> std::iter::FromIterator<&'a Color> for ColorSet {
  fn from_iter<I: IntoIterator<Item = &'a Color>>(iter: I) -> Self {
    iter.into_iter().copied().collect()
  }
}

/// Card represents a Magic: The Gathering card as returned by a card catalog.
/// Cards are immutable once fetched.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
  /// Catalog id
  pub id: String,
  /// Unique card name
  pub name: String,
  /// Mana cost in "{1}{R}{R}" style format, if the card has one
  pub mana_cost: Option<String>,
  /// Free text type line, e.g. "Creature — Goblin"
  pub type_line: String,
  pub oracle_text: Option<String>,
  pub set_name: String,
  pub rarity: Rarity,
  /// A URI to an image of the card
  pub image_uri: Option<String>,
  pub colors: ColorSet,
  /// Mana value
  pub cmc: f32,
}

impl Card {
  /// Returns an otherwise empty card with the given name
  pub fn named(name: &str) -> Self {
    Self {
      name: name.to_string(),
      ..Self::default()
    }
  }

  pub fn is_land(&self) -> bool {
    self.type_line.contains("Land")
  }

  pub fn is_token(&self) -> bool {
    self.type_line.contains("Token")
  }

  pub fn is_creature(&self) -> bool {
    self.type_line.contains("Creature")
  }
}
