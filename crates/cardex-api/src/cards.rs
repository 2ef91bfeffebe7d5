//! Handler for `GET /cards`.
//!
//! Query params are validated into a [`CardFilter`] before the store is
//! touched; `colors` is a comma-separated list of symbols.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use cardex_core::{
  card::Card,
  filter::{CardFilter, FilterParams},
  store::CardStore,
};

use crate::error::ApiError;

/// `GET /cards[?name=...][&oracle=...][&cmc=...][&colors=...][&colorLogic=...]`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Card>>, ApiError>
where
  S: CardStore,
{
  let filter = CardFilter::try_from(params)?;

  let cards = store
    .search(&filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(cards))
}
