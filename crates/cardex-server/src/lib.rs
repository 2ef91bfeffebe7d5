//! Cardex server: configuration, router assembly and catalog ingestion.

pub mod ingest;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use cardex_core::store::CardStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Environment variables with this prefix override file settings,
/// e.g. `CARDEX_PORT=9000`.
pub const ENV_PREFIX: &str = "CARDEX";

/// Runtime configuration, deserialised from `config.toml` and the environment.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Endpoint returning the set list as `{"data": [...]}`.
  pub sets_url:   String,
  /// Bulk card dump: one JSON array of card objects.
  pub cards_path: PathBuf,
}

/// Load configuration from `path` (optional) layered under `CARDEX_*`
/// environment variables, falling back to built-in defaults.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .set_default("host", "0.0.0.0")?
    .set_default("port", 8080)?
    .set_default("store_path", "cardex.db")?
    .set_default("sets_url", "https://api.scryfall.com/sets")?
    .set_default("cards_path", "all_cards.json")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix(ENV_PREFIX))
    .build()
    .context("failed to read config file")?;

  let mut cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  cfg.store_path = expand_tilde(&cfg.store_path);
  cfg.cards_path = expand_tilde(&cfg.cards_path);
  Ok(cfg)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, with request tracing.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: CardStore + 'static,
{
  Router::new()
    .nest("/api", cardex_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
