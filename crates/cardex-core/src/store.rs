//! The `CardStore` trait and the ingestion report.
//!
//! The trait is implemented by storage backends (e.g. `cardex-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  card::{Card, CardArt, RawCard, RawSet, Suggestion},
  filter::CardFilter,
};

// ─── Ingestion report ────────────────────────────────────────────────────────

/// Summary of one catalog rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
  pub sets:             usize,
  pub cards:            usize,
  /// Cards stored without a set reference because their code was unknown.
  pub unresolved_cards: usize,
  pub multi_faced:      usize,
  pub started_at:       DateTime<Utc>,
  pub finished_at:      DateTime<Utc>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a card catalog backend.
///
/// The catalog is read-only between rebuilds. All methods return `Send`
/// futures so the trait can be used behind `axum`.
pub trait CardStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Cards matching `filter` and the catalog base predicate, ordered by name,
  /// at most [`SEARCH_LIMIT`](crate::query::SEARCH_LIMIT).
  fn search<'a>(
    &'a self,
    filter: &'a CardFilter,
  ) -> impl Future<Output = Result<Vec<Card>, Self::Error>> + Send + 'a;

  /// One uniformly random card eligible for the art game, if any.
  fn random_art(
    &self,
  ) -> impl Future<Output = Result<Option<CardArt>, Self::Error>> + Send + '_;

  /// Eligible card names starting with `prefix` (case-insensitive), ordered
  /// alphabetically, at most [`SUGGESTION_LIMIT`](crate::query::SUGGESTION_LIMIT).
  fn suggest<'a>(
    &'a self,
    prefix: &'a str,
  ) -> impl Future<Output = Result<Vec<Suggestion>, Self::Error>> + Send + 'a;

  // ── Ingestion ─────────────────────────────────────────────────────────

  /// Replace the whole catalog with `sets` and the normalized `cards`.
  ///
  /// Either the new catalog is fully written or the previous one is left
  /// untouched.
  fn rebuild_catalog(
    &self,
    sets: Vec<RawSet>,
    cards: Vec<RawCard>,
  ) -> impl Future<Output = Result<IngestReport, Self::Error>> + Send + '_;
}
