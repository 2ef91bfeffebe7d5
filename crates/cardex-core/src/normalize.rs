//! The card normalizer: turns a [`RawCard`] into the flattened [`NewCard`]
//! shape stored in the catalog.

use std::collections::HashMap;

use crate::card::{CardFace, NewCard, RawCard};

/// What a card needs to know about the set it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRef {
  pub set_id:   i64,
  pub set_type: String,
}

/// Set lookup by code, built while the set list is inserted.
///
/// Set codes are not unique in the store; the first set inserted for a code
/// wins, matching a lookup that returns the lowest `set_id`.
#[derive(Debug, Clone, Default)]
pub struct SetIndex {
  by_code: HashMap<String, SetRef>,
}

impl SetIndex {
  pub fn new() -> Self { Self::default() }

  /// Register a set. Returns `false` if the code was already registered.
  pub fn insert(&mut self, code: impl Into<String>, set: SetRef) -> bool {
    let mut inserted = false;
    self.by_code.entry(code.into()).or_insert_with(|| {
      inserted = true;
      set
    });
    inserted
  }

  pub fn resolve(&self, code: &str) -> Option<&SetRef> { self.by_code.get(code) }

  pub fn len(&self) -> usize { self.by_code.len() }

  pub fn is_empty(&self) -> bool { self.by_code.is_empty() }
}

/// Normalize one card record.
///
/// Unknown set codes leave `set_id` and `set_type` empty; the card is still
/// stored. An empty face list is treated the same as no face list.
pub fn normalize_card(raw: RawCard, sets: &SetIndex) -> NewCard {
  let set = raw.set_code.as_deref().and_then(|code| sets.resolve(code));
  let images = raw.image_uris.unwrap_or_default();
  let faces = raw.card_faces.filter(|faces| !faces.is_empty());

  let first_face = faces.as_ref().and_then(|faces| faces.first());
  let face_text =
    |get: fn(&CardFace) -> Option<&str>| first_face.and_then(get).map(str::to_owned);

  NewCard {
    name:                    raw.name,
    mana_cost:               raw.mana_cost,
    cmc:                     raw.cmc.map(|n| n.to_string()),
    type_line:               raw.type_line,
    oracle_text:             raw.oracle_text,
    rarity:                  raw.rarity,
    set_name:                raw.set_name,
    set_type:                set.map(|s| s.set_type.clone()),
    set_id:                  set.map(|s| s.set_id),
    image_uri_normal:        images.normal,
    image_uri_large:         images.large,
    image_uri_art_crop:      images.art_crop,
    face_oracle_text:        face_text(CardFace::oracle_text),
    face_image_uri_normal:   face_text(|f| f.image_uri("normal")),
    face_image_uri_large:    face_text(|f| f.image_uri("large")),
    face_image_uri_art_crop: face_text(|f| f.image_uri("art_crop")),
    card_faces:              faces,
    color_identity:          raw.color_identity,
  }
}
