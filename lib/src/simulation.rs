//! # Opening hand and match simulation
//!
//! A hand is keepable when it holds 2 to 5 basic lands. A simulated match
//! draws one opening hand per deck and per game: a keepable hand beats an
//! unkeepable one, anything else is a tie.
use crate::deck::CardCounts;
use rand::prelude::*;

/// Default opening hand size
pub const HAND_SIZE: usize = 7;
/// Default number of games per simulated match
pub const ITERATIONS: usize = 1000;

pub const BASIC_LANDS: [&str; 5] = ["Plains", "Island", "Swamp", "Mountain", "Forest"];

const MIN_LANDS: usize = 2;
const MAX_LANDS: usize = 5;

pub fn is_basic_land(name: &str) -> bool {
  BASIC_LANDS.contains(&name)
}

/// Draws `hand_size` cards without replacement, every copy being equally
/// likely. Returns None when the deck holds fewer than `hand_size` cards.
pub fn draw_hand<'a>(
  rng: &mut impl Rng,
  deck: &'a CardCounts,
  hand_size: usize,
) -> Option<Vec<&'a str>> {
  let mut cards = deck.flatten();
  if cards.len() < hand_size {
    return None;
  }
  let (hand, _) = cards.partial_shuffle(rng, hand_size);
  Some(hand.to_vec())
}

/// Returns the number of basic lands in `hand`
pub fn land_count(hand: &[&str]) -> usize {
  hand.iter().filter(|name| is_basic_land(name)).count()
}

pub fn is_keepable(hand: &[&str]) -> bool {
  let lands = land_count(hand);
  lands >= MIN_LANDS && lands <= MAX_LANDS
}

/// Draws one opening hand and returns true if it is keepable.
/// A deck too small to draw a hand never is.
pub fn hand_quality(rng: &mut impl Rng, deck: &CardCounts, hand_size: usize) -> bool {
  draw_hand(rng, deck, hand_size).map_or(false, |hand| is_keepable(&hand))
}

/// Returns the fraction of `runs` opening hands that are keepable
pub fn keep_rate(rng: &mut impl Rng, deck: &CardCounts, hand_size: usize, runs: usize) -> f64 {
  if runs == 0 {
    return 0.0;
  }
  let kept = (0..runs)
    .filter(|_| hand_quality(rng, deck, hand_size))
    .count();
  kept as f64 / runs as f64
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
  pub iterations: usize,
  pub hand_size: usize,
}

impl Default for MatchConfig {
  fn default() -> Self {
    Self {
      iterations: ITERATIONS,
      hand_size: HAND_SIZE,
    }
  }
}

/// Game outcomes of a simulated match. The three counts always add up to
/// the number of iterations.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
  pub wins_a: usize,
  pub wins_b: usize,
  pub ties: usize,
}

impl MatchTally {
  pub fn games(&self) -> usize {
    self.wins_a + self.wins_b + self.ties
  }
}

pub fn simulate_match(
  rng: &mut impl Rng,
  deck_a: &CardCounts,
  deck_b: &CardCounts,
  config: &MatchConfig,
) -> MatchTally {
  let mut tally = MatchTally::default();
  for _ in 0..config.iterations {
    let a = hand_quality(rng, deck_a, config.hand_size);
    let b = hand_quality(rng, deck_b, config.hand_size);
    match (a, b) {
      (true, false) => tally.wins_a += 1,
      (false, true) => tally.wins_b += 1,
      _ => tally.ties += 1,
    }
  }
  debug!(
    "Simulated {} games: {}-{}-{}",
    config.iterations, tally.wins_a, tally.wins_b, tally.ties
  );
  tally
}
