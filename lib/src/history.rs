//! # Match history and archetype recommendations
//!
//! The match history is an append-only list of manually recorded results.
//! `recommend` scans it for auto-built decks of a given color combination
//! and picks the archetype with the best win rate.
use crate::archetype::{color_combo, label_matches, Archetype};
use crate::card::{validate_colors, Color};
use crate::error::InputError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
  #[serde(rename = "W")]
  Win,
  #[serde(rename = "L")]
  Loss,
  #[serde(rename = "T")]
  Tie,
}

impl fmt::Display for MatchResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Win => "W",
      Self::Loss => "L",
      Self::Tie => "T",
    };
    write!(f, "{}", s)
  }
}

impl FromStr for MatchResult {
  type Err = InputError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "w" | "win" => Ok(Self::Win),
      "l" | "loss" => Ok(Self::Loss),
      "t" | "tie" => Ok(Self::Tie),
      _ => Err(InputError::InvalidResult(s.to_string())),
    }
  }
}

/// One recorded game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
  /// Free text deck label, by convention "<Archetype> <C/C> ..." for auto-built decks
  pub deck: String,
  pub opponent: String,
  pub result: MatchResult,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub recorded_at: Option<DateTime<Utc>>,
}

impl MatchRecord {
  pub fn new(deck: &str, opponent: &str, result: MatchResult) -> Self {
    Self {
      deck: deck.to_string(),
      opponent: opponent.to_string(),
      result,
      recorded_at: None,
    }
  }

  /// Returns a record stamped with the current time
  pub fn now(deck: &str, opponent: &str, result: MatchResult) -> Self {
    Self {
      recorded_at: Some(Utc::now()),
      ..Self::new(deck, opponent, result)
    }
  }
}

/// Decisive games of one archetype. Ties are not counted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Score {
  pub wins: usize,
  pub losses: usize,
}

impl Score {
  pub fn games(&self) -> usize {
    self.wins + self.losses
  }

  /// Returns wins / (wins + losses), or None without decisive games
  pub fn win_rate(&self) -> Option<f64> {
    if self.games() == 0 {
      None
    } else {
      Some(self.wins as f64 / self.games() as f64)
    }
  }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Recommendation {
  pub archetype: Archetype,
  pub win_rate: f64,
  pub score: Score,
}

/// Returns the score of every archetype for `colors`, in `Archetype::ALL` order
pub fn archetype_scores(colors: &[Color], history: &[MatchRecord]) -> Vec<(Archetype, Score)> {
  let combo = color_combo(colors);
  Archetype::ALL
    .iter()
    .map(|&archetype| {
      let mut score = Score::default();
      for record in history
        .iter()
        .filter(|r| label_matches(&r.deck, archetype, &combo))
      {
        match record.result {
          MatchResult::Win => score.wins += 1,
          MatchResult::Loss => score.losses += 1,
          MatchResult::Tie => {}
        }
      }
      (archetype, score)
    })
    .collect()
}

/// Returns the archetype with the highest win rate for `colors`, or None if
/// no archetype has a decisive game on record. Equal rates keep the
/// archetype evaluated first.
pub fn recommend(
  colors: &[Color],
  history: &[MatchRecord],
) -> Result<Option<Recommendation>, InputError> {
  validate_colors(colors)?;
  let mut best: Option<Recommendation> = None;
  for (archetype, score) in archetype_scores(colors, history) {
    let win_rate = match score.win_rate() {
      Some(rate) => rate,
      None => continue,
    };
    let better = best.map_or(true, |b| win_rate > b.win_rate);
    if better {
      best = Some(Recommendation {
        archetype,
        win_rate,
        score,
      });
    }
  }
  if let Some(rec) = &best {
    debug!(
      "Recommending {} for {} ({}/{} games won)",
      rec.archetype,
      color_combo(colors),
      rec.score.wins,
      rec.score.games()
    );
  }
  Ok(best)
}

/// Resolves the archetype to build: a manual choice wins over a
/// recommendation, Midrange is the fallback
pub fn pick_archetype(
  manual: Option<Archetype>,
  recommendation: Option<Recommendation>,
) -> Archetype {
  manual
    .or_else(|| recommendation.map(|r| r.archetype))
    .unwrap_or(Archetype::Midrange)
}
