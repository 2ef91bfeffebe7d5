//! [`SqliteStore`], the SQLite implementation of [`CardStore`].

use std::path::Path;

use cardex_core::{
  card::{Card, CardArt, RawCard, RawSet, Suggestion},
  filter::CardFilter,
  normalize::{SetIndex, SetRef, normalize_card},
  query,
  render::{LOWER_FN, Statement, fold_case},
  store::{CardStore, IngestReport},
};
use chrono::Utc;
use rusqlite::{Row, Transaction, functions::FunctionFlags, params, params_from_iter};

use crate::{
  Error, Result,
  encode::{RawCardRow, encode_colors, encode_faces, encode_param},
  schema::{DROP_TABLES, PRAGMAS, TABLES},
};

/// Log a progress line every this many ingested cards.
const PROGRESS_EVERY: usize = 10_000;

const INSERT_SET: &str =
  "INSERT INTO sets (code, set_name, set_type, block) VALUES (?1, ?2, ?3, ?4)";

const INSERT_CARD: &str = "INSERT INTO cards (
     name, mana_cost, cmc, type_line, oracle_text, rarity,
     set_name, set_type, set_id,
     image_uri_normal, image_uri_large, image_uri_art_crop,
     card_faces, face_oracle_text,
     face_image_uri_normal, face_image_uri_large, face_image_uri_art_crop,
     color_identity
   ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Cardex catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        conn.create_scalar_function(
          LOWER_FN,
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| fold_case(&v)))
          },
        )?;
        conn.execute_batch(TABLES)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` inside its own transaction.
  ///
  /// The transaction commits if `f` succeeds and rolls back if it fails; the
  /// connection is handed back to the store on every path.
  pub(crate) async fn scoped<F, R>(&self, op: &'static str, f: F) -> Result<R>
  where
    F: FnOnce(&Transaction<'_>) -> Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match f(&tx) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          // Dropping `tx` rolls it back.
          Err(e) => Ok(Err(e)),
        }
      })
      .await;

    let result = outcome.map_err(Error::Database).and_then(|inner| inner);
    if let Err(e) = &result {
      tracing::warn!(op, error = %e, "store operation rolled back");
    }
    result
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────

/// Run a rendered statement and map every row.
fn query_all<T, F>(tx: &Transaction<'_>, stmt: &Statement, map: F) -> Result<Vec<T>>
where
  F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
  let mut prepared = tx.prepare(&stmt.sql)?;
  let rows = prepared
    .query_map(params_from_iter(stmt.params.iter().map(encode_param)), map)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Insert every set and index them by code.
fn insert_sets(tx: &Transaction<'_>, sets: &[RawSet]) -> Result<SetIndex> {
  let mut index = SetIndex::new();
  let mut stmt = tx.prepare(INSERT_SET)?;

  for set in sets {
    let set_id = stmt.insert(params![set.code, set.name, set.set_type, set.block])?;
    let set_ref = SetRef { set_id, set_type: set.set_type.clone() };
    if !index.insert(set.code.clone(), set_ref) {
      tracing::debug!(code = %set.code, set_id, "duplicate set code; keeping the first");
    }
  }

  Ok(index)
}

#[derive(Debug, Default)]
struct Tally {
  cards:       usize,
  unresolved:  usize,
  multi_faced: usize,
}

/// Normalize and insert every card.
fn insert_cards(
  tx: &Transaction<'_>,
  cards: Vec<RawCard>,
  index: &SetIndex,
) -> Result<Tally> {
  let mut stmt = tx.prepare(INSERT_CARD)?;
  let mut tally = Tally::default();

  for raw in cards {
    let code = raw.set_code.clone();
    let card = normalize_card(raw, index);

    if card.set_id.is_none() {
      tally.unresolved += 1;
      tracing::debug!(name = %card.name, set = ?code, "unknown set code");
    }
    if card.card_faces.is_some() {
      tally.multi_faced += 1;
    }

    let faces_json = card.card_faces.as_deref().map(encode_faces).transpose()?;
    let colors_json = encode_colors(&card.color_identity)?;

    stmt.execute(params![
      card.name,
      card.mana_cost,
      card.cmc,
      card.type_line,
      card.oracle_text,
      card.rarity,
      card.set_name,
      card.set_type,
      card.set_id,
      card.image_uri_normal,
      card.image_uri_large,
      card.image_uri_art_crop,
      faces_json,
      card.face_oracle_text,
      card.face_image_uri_normal,
      card.face_image_uri_large,
      card.face_image_uri_art_crop,
      colors_json,
    ])?;

    tally.cards += 1;
    if tally.cards % PROGRESS_EVERY == 0 {
      tracing::info!(cards = tally.cards, "ingesting cards");
    }
  }

  Ok(tally)
}

// ─── CardStore impl ──────────────────────────────────────────────────────────

impl CardStore for SqliteStore {
  type Error = Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn search(&self, filter: &CardFilter) -> Result<Vec<Card>> {
    let stmt = query::search(filter);
    tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "search");

    let raws = self
      .scoped("search", move |tx| query_all(tx, &stmt, RawCardRow::from_row))
      .await?;

    raws.into_iter().map(RawCardRow::into_card).collect()
  }

  async fn random_art(&self) -> Result<Option<CardArt>> {
    let stmt = query::random_art();

    let arts = self
      .scoped("random_art", move |tx| {
        query_all(tx, &stmt, |row| {
          Ok(CardArt {
            name:               row.get(0)?,
            image_uri_art_crop: row.get(1)?,
          })
        })
      })
      .await?;

    Ok(arts.into_iter().next())
  }

  async fn suggest(&self, prefix: &str) -> Result<Vec<Suggestion>> {
    let stmt = query::suggestions(prefix);

    self
      .scoped("suggest", move |tx| {
        query_all(tx, &stmt, |row| Ok(Suggestion { name: row.get(0)? }))
      })
      .await
  }

  // ── Ingestion ─────────────────────────────────────────────────────────────

  async fn rebuild_catalog(
    &self,
    sets: Vec<RawSet>,
    cards: Vec<RawCard>,
  ) -> Result<IngestReport> {
    let started_at = Utc::now();

    let (set_count, tally) = self
      .scoped("rebuild_catalog", move |tx| {
        tx.execute_batch(DROP_TABLES)?;
        tx.execute_batch(TABLES)?;

        let index = insert_sets(tx, &sets)?;
        tracing::info!(sets = sets.len(), codes = index.len(), "sets loaded");

        let tally = insert_cards(tx, cards, &index)?;
        Ok((sets.len(), tally))
      })
      .await?;

    Ok(IngestReport {
      sets: set_count,
      cards: tally.cards,
      unresolved_cards: tally.unresolved,
      multi_faced: tally.multi_faced,
      started_at,
      finished_at: Utc::now(),
    })
  }
}
