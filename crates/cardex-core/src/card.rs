//! Card and set types.
//!
//! `Raw*` types mirror the external data sources (the set list endpoint and
//! the bulk card dump) and are only ever read. [`NewCard`] is the normalized,
//! flattened shape written to the store, and [`Card`] is a stored row.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

// ─── Colors ──────────────────────────────────────────────────────────────────

/// A color identity symbol.
///
/// `C` is the colorless marker. It is accepted in filters but never appears in
/// a card's identity; colorless cards have an empty identity instead.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Color {
  W,
  U,
  B,
  R,
  G,
  C,
}

impl Color {
  pub const ALL: [Color; 6] =
    [Color::W, Color::U, Color::B, Color::R, Color::G, Color::C];

  pub fn symbol(self) -> &'static str {
    match self {
      Color::W => "W",
      Color::U => "U",
      Color::B => "B",
      Color::R => "R",
      Color::G => "G",
      Color::C => "C",
    }
  }
}

impl fmt::Display for Color {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

impl FromStr for Color {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Color::ALL
      .into_iter()
      .find(|c| c.symbol().eq_ignore_ascii_case(s))
      .ok_or_else(|| Error::InvalidColor(s.to_owned()))
  }
}

/// Sorted symbol key used for order-independent identity comparison.
///
/// Sorting is by symbol text so the key matches what SQLite produces when it
/// orders identity values.
pub fn sorted_symbols(colors: &[Color]) -> Vec<&'static str> {
  let mut symbols: Vec<&'static str> = colors.iter().map(|c| c.symbol()).collect();
  symbols.sort_unstable();
  symbols
}

// ─── Images ──────────────────────────────────────────────────────────────────

/// The image sizes the catalog copies out of an image URI map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUris {
  #[serde(default)]
  pub normal:   Option<String>,
  #[serde(default)]
  pub large:    Option<String>,
  #[serde(default)]
  pub art_crop: Option<String>,
}

/// One printed side of a multi-faced card, kept exactly as the source wrote
/// it. Explicit `null`s and unknown keys survive a store round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardFace(pub Map<String, Value>);

impl CardFace {
  fn text(&self, key: &str) -> Option<&str> { self.0.get(key).and_then(Value::as_str) }

  pub fn name(&self) -> Option<&str> { self.text("name") }

  pub fn oracle_text(&self) -> Option<&str> { self.text("oracle_text") }

  /// One size from the face's `image_uris` object, e.g. `"art_crop"`.
  pub fn image_uri(&self, size: &str) -> Option<&str> {
    self
      .0
      .get("image_uris")
      .and_then(|uris| uris.get(size))
      .and_then(Value::as_str)
  }
}

impl From<Map<String, Value>> for CardFace {
  fn from(map: Map<String, Value>) -> Self { CardFace(map) }
}

// ─── Sets ────────────────────────────────────────────────────────────────────

/// The envelope returned by the external set list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SetList {
  pub data: Vec<RawSet>,
}

/// A set descriptor as supplied by the external set list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSet {
  pub code:     String,
  pub name:     String,
  pub set_type: String,
  #[serde(default)]
  pub block:    Option<String>,
}

/// A stored set row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
  pub set_id:   i64,
  pub code:     String,
  pub set_name: String,
  pub set_type: String,
  pub block:    Option<String>,
}

// ─── Cards ───────────────────────────────────────────────────────────────────

/// A card record from the bulk dump. Fields the catalog does not use are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCard {
  pub name:           String,
  pub mana_cost:      Option<String>,
  /// Kept as the source's number so it can be stored in its printed form.
  pub cmc:            Option<serde_json::Number>,
  pub type_line:      Option<String>,
  pub oracle_text:    Option<String>,
  pub rarity:         Option<String>,
  /// The set code.
  #[serde(rename = "set")]
  pub set_code:       Option<String>,
  pub set_name:       Option<String>,
  pub image_uris:     Option<ImageUris>,
  pub card_faces:     Option<Vec<CardFace>>,
  #[serde(default)]
  pub color_identity: Vec<Color>,
}

/// A normalized card, ready to be written to the store.
///
/// When `card_faces` is present the `face_*` fields are copies of the first
/// face; otherwise they are all `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
  pub name:                    String,
  pub mana_cost:               Option<String>,
  pub cmc:                     Option<String>,
  pub type_line:               Option<String>,
  pub oracle_text:             Option<String>,
  pub rarity:                  Option<String>,
  pub set_name:                Option<String>,
  pub set_type:                Option<String>,
  pub set_id:                  Option<i64>,
  pub image_uri_normal:        Option<String>,
  pub image_uri_large:         Option<String>,
  pub image_uri_art_crop:      Option<String>,
  pub card_faces:              Option<Vec<CardFace>>,
  pub face_oracle_text:        Option<String>,
  pub face_image_uri_normal:   Option<String>,
  pub face_image_uri_large:    Option<String>,
  pub face_image_uri_art_crop: Option<String>,
  pub color_identity:          Vec<Color>,
}

/// A stored card row. Serializes flat, with `id` alongside the card columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
  pub id:   i64,
  #[serde(flatten)]
  pub card: NewCard,
}

/// Result of the random-art query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardArt {
  pub name:               String,
  pub image_uri_art_crop: String,
}

/// One name suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
  pub name: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn color_parses_case_insensitively() {
    assert_eq!("r".parse::<Color>().unwrap(), Color::R);
    assert_eq!("C".parse::<Color>().unwrap(), Color::C);
    assert_eq!(
      "X".parse::<Color>().unwrap_err(),
      Error::InvalidColor("X".into())
    );
  }

  #[test]
  fn sorted_symbols_orders_by_text() {
    assert_eq!(
      sorted_symbols(&[Color::W, Color::U, Color::B]),
      vec!["B", "U", "W"]
    );
  }

  #[test]
  fn card_face_keeps_unknown_fields() {
    let json = serde_json::json!({
      "name": "Delver of Secrets",
      "mana_cost": "{U}",
      "oracle_text": "At the beginning of your upkeep...",
      "image_uris": { "normal": "n", "small": "s" },
    });
    let face: CardFace = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(face.name(), Some("Delver of Secrets"));
    assert_eq!(face.image_uri("normal"), Some("n"));
    assert_eq!(face.image_uri("art_crop"), None);
    assert_eq!(face.0["mana_cost"], "{U}");
    assert_eq!(serde_json::to_value(&face).unwrap(), json);
  }

  #[test]
  fn card_face_keeps_explicit_nulls() {
    let json = serde_json::json!({ "name": "X", "oracle_text": null, "image_uris": null });
    let face: CardFace = serde_json::from_value(json.clone()).unwrap();
    assert_eq!(face.oracle_text(), None);
    assert_eq!(face.image_uri("normal"), None);
    assert_eq!(serde_json::to_value(&face).unwrap(), json);
  }

  #[test]
  fn raw_card_defaults_missing_fields() {
    let raw: RawCard = serde_json::from_value(serde_json::json!({
      "name": "Island",
      "set": "lea",
      "cmc": 0.0,
    }))
    .unwrap();
    assert_eq!(raw.set_code.as_deref(), Some("lea"));
    assert!(raw.color_identity.is_empty());
    assert!(raw.card_faces.is_none());
    assert_eq!(raw.cmc.unwrap().to_string(), "0.0");
  }

  #[test]
  fn card_serializes_flat() {
    let card = Card {
      id:   7,
      card: NewCard { name: "Shock".into(), ..NewCard::default() },
    };
    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["name"], "Shock");
    assert!(json["card_faces"].is_null());
  }
}
