//! Handlers backing the guess-the-card game.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/random-card-art` | `null` when no card qualifies |
//! | `GET`  | `/suggestions` | `?name=<prefix>`, at most seven names |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use cardex_core::{
  card::{CardArt, Suggestion},
  store::CardStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Random art ──────────────────────────────────────────────────────────────

/// `GET /random-card-art`
pub async fn random_art<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Option<CardArt>>, ApiError>
where
  S: CardStore,
{
  let art = store
    .random_art()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(art))
}

// ─── Suggestions ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SuggestionParams {
  /// Name prefix, matched case-insensitively. Missing means empty.
  #[serde(default)]
  pub name: String,
}

/// `GET /suggestions?name=<prefix>`
pub async fn suggestions<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SuggestionParams>,
) -> Result<Json<Vec<Suggestion>>, ApiError>
where
  S: CardStore,
{
  let names = store
    .suggest(&params.name)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(names))
}
