//! Encoding and decoding helpers between Cardex domain types and the plain
//! representations stored in SQLite columns.
//!
//! Face lists and color identities are stored as compact JSON text. Bound
//! query parameters are converted to [`rusqlite::types::Value`].

use cardex_core::{
  card::{Card, CardFace, Color, NewCard},
  render::Param,
};
use rusqlite::{Row, types::Value};

use crate::Result;

// ─── Params ──────────────────────────────────────────────────────────────────

pub fn encode_param(p: &Param) -> Value {
  match p {
    Param::Text(s) => Value::Text(s.clone()),
    Param::Integer(i) => Value::Integer(*i),
  }
}

// ─── Color identity ──────────────────────────────────────────────────────────

pub fn encode_colors(colors: &[Color]) -> Result<String> {
  Ok(serde_json::to_string(colors)?)
}

pub fn decode_colors(s: &str) -> Result<Vec<Color>> { Ok(serde_json::from_str(s)?) }

// ─── Faces ───────────────────────────────────────────────────────────────────

pub fn encode_faces(faces: &[CardFace]) -> Result<String> {
  Ok(serde_json::to_string(faces)?)
}

pub fn decode_faces(s: &str) -> Result<Vec<CardFace>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `cards` row, in
/// [`CARD_COLUMNS`](cardex_core::query::CARD_COLUMNS) order.
pub struct RawCardRow {
  pub id:                      i64,
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
  pub card_faces:              Option<String>,
  pub face_oracle_text:        Option<String>,
  pub face_image_uri_normal:   Option<String>,
  pub face_image_uri_large:    Option<String>,
  pub face_image_uri_art_crop: Option<String>,
  pub color_identity:          String,
}

impl RawCardRow {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                      row.get(0)?,
      name:                    row.get(1)?,
      mana_cost:               row.get(2)?,
      cmc:                     row.get(3)?,
      type_line:               row.get(4)?,
      oracle_text:             row.get(5)?,
      rarity:                  row.get(6)?,
      set_name:                row.get(7)?,
      set_type:                row.get(8)?,
      set_id:                  row.get(9)?,
      image_uri_normal:        row.get(10)?,
      image_uri_large:         row.get(11)?,
      image_uri_art_crop:      row.get(12)?,
      card_faces:              row.get(13)?,
      face_oracle_text:        row.get(14)?,
      face_image_uri_normal:   row.get(15)?,
      face_image_uri_large:    row.get(16)?,
      face_image_uri_art_crop: row.get(17)?,
      color_identity:          row.get(18)?,
    })
  }

  pub fn into_card(self) -> Result<Card> {
    let card_faces = self.card_faces.as_deref().map(decode_faces).transpose()?;
    let color_identity = decode_colors(&self.color_identity)?;

    Ok(Card {
      id:   self.id,
      card: NewCard {
        name: self.name,
        mana_cost: self.mana_cost,
        cmc: self.cmc,
        type_line: self.type_line,
        oracle_text: self.oracle_text,
        rarity: self.rarity,
        set_name: self.set_name,
        set_type: self.set_type,
        set_id: self.set_id,
        image_uri_normal: self.image_uri_normal,
        image_uri_large: self.image_uri_large,
        image_uri_art_crop: self.image_uri_art_crop,
        card_faces,
        face_oracle_text: self.face_oracle_text,
        face_image_uri_normal: self.face_image_uri_normal,
        face_image_uri_large: self.face_image_uri_large,
        face_image_uri_art_crop: self.face_image_uri_art_crop,
        color_identity,
      },
    })
  }
}
