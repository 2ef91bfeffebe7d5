//! The fixed query shapes the catalog answers.
//!
//! Every shape shares the same catalog exclusions: only playable set types,
//! no alternate-art (`A-`) printings, and no cards from the excluded set.

use crate::{
  filter::CardFilter,
  predicate::{Field, Predicate},
  render::{Order, Select, Statement},
};

/// Maximum rows returned by a filtered search.
pub const SEARCH_LIMIT: u32 = 100;

/// Maximum names returned by a suggestion query.
pub const SUGGESTION_LIMIT: u32 = 7;

pub const ALLOWED_SET_TYPES: [&str; 6] = [
  "core",
  "expansion",
  "masters",
  "draft_innovation",
  "commander",
  "starter",
];

pub const EXCLUDED_SET_NAME: &str = "Mystery Booster 2";

/// Name prefix of rebalanced alternate-art printings.
pub const ALT_ART_PREFIX: &str = "A-";

/// Type-line prefixes eligible for the art game and suggestions.
pub const PRIMARY_TYPES: [&str; 8] = [
  "Creature",
  "Legendary",
  "Artifact",
  "Enchantment",
  "Planeswalker",
  "Sorcery",
  "Land",
  "Instant",
];

/// Column list for full card rows, in the order the store decodes them.
pub const CARD_COLUMNS: &str = "id, name, mana_cost, cmc, type_line, oracle_text, \
  rarity, set_name, set_type, set_id, image_uri_normal, image_uri_large, \
  image_uri_art_crop, card_faces, face_oracle_text, face_image_uri_normal, \
  face_image_uri_large, face_image_uri_art_crop, color_identity";

/// Set type, alternate-art and excluded-set restrictions.
pub fn catalog_exclusions() -> Vec<Predicate> {
  vec![
    Predicate::In(
      Field::SetType,
      ALLOWED_SET_TYPES.iter().map(|s| (*s).to_owned()).collect(),
    ),
    Predicate::not(Predicate::StartsWith(Field::Name, ALT_ART_PREFIX.to_owned())),
    Predicate::not(Predicate::Equals(Field::SetName, EXCLUDED_SET_NAME.to_owned())),
  ]
}

/// Type line starts with one of [`PRIMARY_TYPES`].
pub fn primary_type() -> Predicate {
  Predicate::Or(
    PRIMARY_TYPES
      .iter()
      .map(|t| Predicate::StartsWith(Field::TypeLine, (*t).to_owned()))
      .collect(),
  )
}

/// The predicate every search applies before the caller's filter.
pub fn base_predicate() -> Predicate {
  let mut clauses = catalog_exclusions();
  clauses.push(Predicate::NotEmpty(Field::ManaCost));
  Predicate::And(clauses)
}

/// The full predicate for a filtered search.
pub fn search_predicate(filter: &CardFilter) -> Predicate {
  Predicate::And(vec![base_predicate(), filter.predicate()])
}

/// The full predicate for the random-art query.
pub fn random_art_predicate() -> Predicate {
  let mut clauses = vec![Predicate::IsNotNull(Field::ArtCrop)];
  clauses.extend(catalog_exclusions());
  clauses.push(primary_type());
  Predicate::And(clauses)
}

/// The full predicate for a suggestion query.
pub fn suggestion_predicate(prefix: &str) -> Predicate {
  let mut clauses = catalog_exclusions();
  clauses.push(primary_type());
  clauses.push(Predicate::StartsWithIgnoreCase(Field::Name, prefix.to_owned()));
  Predicate::And(clauses)
}

/// Filtered search: full rows, by name, at most [`SEARCH_LIMIT`].
pub fn search(filter: &CardFilter) -> Statement {
  Select {
    columns: CARD_COLUMNS,
    filter:  search_predicate(filter),
    order:   Order::NameAscending,
    limit:   SEARCH_LIMIT,
  }
  .to_statement()
}

/// One uniformly random card with art: `name, image_uri_art_crop`.
pub fn random_art() -> Statement {
  Select {
    columns: "name, image_uri_art_crop",
    filter:  random_art_predicate(),
    order:   Order::Random,
    limit:   1,
  }
  .to_statement()
}

/// Names starting with `prefix`, alphabetical, at most [`SUGGESTION_LIMIT`].
pub fn suggestions(prefix: &str) -> Statement {
  Select {
    columns: "name",
    filter:  suggestion_predicate(prefix),
    order:   Order::NameAscending,
    limit:   SUGGESTION_LIMIT,
  }
  .to_statement()
}
