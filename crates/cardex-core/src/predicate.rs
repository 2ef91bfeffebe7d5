//! Structured predicates over the card catalog.
//!
//! A [`Predicate`] is built from typed clauses and bound values, never from
//! query text. It has two interpretations that must agree:
//!
//! - [`render`](crate::render) turns it into SQLite text with numbered
//!   placeholders and an ordered parameter list;
//! - [`Predicate::eval`] evaluates it in memory against a [`NewCard`], using
//!   the same three-valued logic SQL applies to `NULL` columns.

use crate::{
  card::{CardFace, Color, NewCard, sorted_symbols},
  render::fold_case,
};

/// A card column (or derived column) a clause can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Name,
  ManaCost,
  Cmc,
  TypeLine,
  OracleText,
  SetName,
  SetType,
  ArtCrop,
  /// Denormalized first-face oracle text; `NULL` reads as empty.
  FaceOracleText,
  /// Oracle text of the second entry in the face list; missing reads as empty.
  SecondFaceOracleText,
}

impl Field {
  /// The SQL expression for this field.
  pub fn sql(self) -> &'static str {
    match self {
      Field::Name => "name",
      Field::ManaCost => "mana_cost",
      Field::Cmc => "cmc",
      Field::TypeLine => "type_line",
      Field::OracleText => "oracle_text",
      Field::SetName => "set_name",
      Field::SetType => "set_type",
      Field::ArtCrop => "image_uri_art_crop",
      Field::FaceOracleText => "COALESCE(face_oracle_text, '')",
      Field::SecondFaceOracleText => {
        "COALESCE(json_extract(card_faces, '$[1].oracle_text'), '')"
      }
    }
  }

  /// The field's value on `card`; `None` stands for SQL `NULL`.
  pub fn value(self, card: &NewCard) -> Option<&str> {
    match self {
      Field::Name => Some(&card.name),
      Field::ManaCost => card.mana_cost.as_deref(),
      Field::Cmc => card.cmc.as_deref(),
      Field::TypeLine => card.type_line.as_deref(),
      Field::OracleText => card.oracle_text.as_deref(),
      Field::SetName => card.set_name.as_deref(),
      Field::SetType => card.set_type.as_deref(),
      Field::ArtCrop => card.image_uri_art_crop.as_deref(),
      Field::FaceOracleText => Some(card.face_oracle_text.as_deref().unwrap_or("")),
      Field::SecondFaceOracleText => Some(
        card
          .card_faces
          .as_ref()
          .and_then(|faces| faces.get(1))
          .and_then(CardFace::oracle_text)
          .unwrap_or(""),
      ),
    }
  }
}

/// A test on the card's color identity, with `R` the requested colors and
/// `I` the card's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorMatch {
  /// R ⊆ I.
  ContainsAll(Vec<Color>),
  /// sorted(R) == sorted(I), duplicates included.
  EqualsSorted(Vec<Color>),
  /// R ∩ I ≠ ∅.
  Intersects(Vec<Color>),
  /// I = ∅.
  Empty,
}

impl ColorMatch {
  pub fn matches(&self, identity: &[Color]) -> bool {
    match self {
      ColorMatch::ContainsAll(requested) => {
        requested.iter().all(|c| identity.contains(c))
      }
      ColorMatch::EqualsSorted(requested) => {
        sorted_symbols(requested) == sorted_symbols(identity)
      }
      ColorMatch::Intersects(requested) => {
        requested.iter().any(|c| identity.contains(c))
      }
      ColorMatch::Empty => identity.is_empty(),
    }
  }
}

/// A boolean expression over a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
  /// Conjunction; empty is true.
  And(Vec<Predicate>),
  /// Disjunction; empty is false.
  Or(Vec<Predicate>),
  Not(Box<Predicate>),
  IsNotNull(Field),
  /// Not `NULL` and not the empty string.
  NotEmpty(Field),
  Equals(Field, String),
  In(Field, Vec<String>),
  /// Case-insensitive (Unicode) literal substring.
  Contains(Field, String),
  /// Case-sensitive literal prefix.
  StartsWith(Field, String),
  /// Case-insensitive (Unicode) literal prefix.
  StartsWithIgnoreCase(Field, String),
  /// The field parsed as a number equals the value.
  NumberEquals(Field, u32),
  Colors(ColorMatch),
}

impl Predicate {
  pub fn not(inner: Predicate) -> Self { Predicate::Not(Box::new(inner)) }

  /// Evaluate with SQL semantics: `None` is `NULL` (unknown).
  pub fn eval(&self, card: &NewCard) -> Option<bool> {
    match self {
      Predicate::And(items) => {
        let mut result = Some(true);
        for item in items {
          match item.eval(card) {
            Some(false) => return Some(false),
            None => result = None,
            Some(true) => {}
          }
        }
        result
      }
      Predicate::Or(items) => {
        let mut result = Some(false);
        for item in items {
          match item.eval(card) {
            Some(true) => return Some(true),
            None => result = None,
            Some(false) => {}
          }
        }
        result
      }
      Predicate::Not(inner) => inner.eval(card).map(|b| !b),
      Predicate::IsNotNull(field) => Some(field.value(card).is_some()),
      Predicate::NotEmpty(field) => field.value(card).map(|v| !v.is_empty()),
      Predicate::Equals(field, expected) => field.value(card).map(|v| v == expected),
      Predicate::In(field, list) => {
        field.value(card).map(|v| list.iter().any(|item| item == v))
      }
      Predicate::Contains(field, needle) => {
        field.value(card).map(|v| fold_case(v).contains(&fold_case(needle)))
      }
      Predicate::StartsWith(field, prefix) => {
        field.value(card).map(|v| v.starts_with(prefix.as_str()))
      }
      Predicate::StartsWithIgnoreCase(field, prefix) => {
        field.value(card).map(|v| fold_case(v).starts_with(&fold_case(prefix)))
      }
      Predicate::NumberEquals(field, n) => {
        field.value(card).map(|v| numeric(v) == f64::from(*n))
      }
      Predicate::Colors(m) => Some(m.matches(&card.color_identity)),
    }
  }

  /// Whether a row would be selected by a `WHERE` clause of this predicate.
  pub fn matches(&self, card: &NewCard) -> bool { self.eval(card) == Some(true) }
}

/// SQLite's `CAST(x AS NUMERIC)` for the values the catalog stores: text that
/// is not a number becomes zero.
fn numeric(v: &str) -> f64 { v.trim().parse().unwrap_or(0.0) }
