//! # Deck, collection and match history persistence
//!
//! The traits describe what the deck tools need from storage. The `File*`
//! stores keep pretty printed JSON files below a data directory:
//!
//! ```text
//! data/decks/<deck name>.json
//! data/collection.json
//! data/match_history.json
//! ```
use crate::collection::Collection;
use crate::deck::{validate_deck_name, Deck};
use crate::error::StoreError;
use crate::history::MatchRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub trait DeckStore {
  fn save(&self, deck: &Deck) -> Result<(), StoreError>;
  /// Returns None if no deck is saved under `name`
  fn load(&self, name: &str) -> Result<Option<Deck>, StoreError>;
  fn list_names(&self) -> Result<Vec<String>, StoreError>;
}

pub trait CollectionStore {
  fn load(&self) -> Result<Collection, StoreError>;
  fn save(&self, collection: &Collection) -> Result<(), StoreError>;
}

pub trait MatchHistoryStore {
  /// Returns every record, oldest first
  fn load_all(&self) -> Result<Vec<MatchRecord>, StoreError>;
  fn append(&self, record: MatchRecord) -> Result<(), StoreError>;
}

/// Reads and parses `path`. Returns None if the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
  match fs::read_to_string(path) {
    Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
    Err(e) => Err(e.into()),
  }
}

/// Like `read_json`, but a missing or unparsable file yields the default value
fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
  match read_json(path) {
    Ok(value) => Ok(value.unwrap_or_default()),
    Err(StoreError::Json(e)) => {
      warn!("Ignoring unreadable {}: {}", path.display(), e);
      Ok(T::default())
    }
    Err(e) => Err(e),
  }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  let json = serde_json::to_string_pretty(value)?;
  fs::write(path, json)?;
  Ok(())
}

/// Saves every deck as `<dir>/<name>.json`
#[derive(Debug, Clone)]
pub struct FileDeckStore {
  dir: PathBuf,
}

impl FileDeckStore {
  pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
    Self { dir: dir.into() }
  }

  fn path(&self, name: &str) -> PathBuf {
    self.dir.join(format!("{}.json", encode_file_stem(name)))
  }
}

/// Deck names may contain path separators ("Aggro R/G Auto"), which are
/// percent encoded in file names
fn encode_file_stem(name: &str) -> String {
  name
    .replace('%', "%25")
    .replace('/', "%2F")
    .replace('\\', "%5C")
}

fn decode_file_stem(stem: &str) -> String {
  stem
    .replace("%2F", "/")
    .replace("%5C", "\\")
    .replace("%25", "%")
}

impl DeckStore for FileDeckStore {
  fn save(&self, deck: &Deck) -> Result<(), StoreError> {
    validate_deck_name(&deck.name)?;
    let path = self.path(&deck.name);
    write_json(&path, deck)?;
    info!("Saved deck \"{}\" ({} cards)", deck.name, deck.total_cards());
    Ok(())
  }

  fn load(&self, name: &str) -> Result<Option<Deck>, StoreError> {
    read_json(&self.path(name))
  }

  fn list_names(&self) -> Result<Vec<String>, StoreError> {
    let entries = match fs::read_dir(&self.dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e.into()),
    };
    let mut names = Vec::new();
    for entry in entries {
      let path = entry?.path();
      if path.extension().map_or(false, |ext| ext == "json") {
        if let Some(stem) = path.file_stem() {
          names.push(decode_file_stem(&stem.to_string_lossy()));
        }
      }
    }
    names.sort();
    Ok(names)
  }
}

#[derive(Debug, Clone)]
pub struct FileCollectionStore {
  path: PathBuf,
}

impl FileCollectionStore {
  pub fn new<P: Into<PathBuf>>(path: P) -> Self {
    Self { path: path.into() }
  }
}

impl CollectionStore for FileCollectionStore {
  fn load(&self) -> Result<Collection, StoreError> {
    read_json_or_default(&self.path)
  }

  fn save(&self, collection: &Collection) -> Result<(), StoreError> {
    write_json(&self.path, collection)
  }
}

/// An append-only match log stored as one JSON array. Appending rewrites the
/// whole file, so concurrent writers can lose records.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
  path: PathBuf,
}

impl FileHistoryStore {
  pub fn new<P: Into<PathBuf>>(path: P) -> Self {
    Self { path: path.into() }
  }
}

impl MatchHistoryStore for FileHistoryStore {
  fn load_all(&self) -> Result<Vec<MatchRecord>, StoreError> {
    read_json_or_default(&self.path)
  }

  fn append(&self, record: MatchRecord) -> Result<(), StoreError> {
    let mut history = self.load_all()?;
    history.push(record);
    write_json(&self.path, &history)
  }
}

/// The stores of one data directory
#[derive(Debug, Clone)]
pub struct DataDir {
  pub decks: FileDeckStore,
  pub collection: FileCollectionStore,
  pub history: FileHistoryStore,
  root: PathBuf,
}

impl DataDir {
  pub fn new<P: Into<PathBuf>>(root: P) -> Self {
    let root = root.into();
    Self {
      decks: FileDeckStore::new(root.join("decks")),
      collection: FileCollectionStore::new(root.join("collection.json")),
      history: FileHistoryStore::new(root.join("match_history.json")),
      root,
    }
  }

  /// Location of the compressed card cache
  pub fn card_cache(&self) -> PathBuf {
    self.root.join("cards_cache.bin.gz")
  }
}
