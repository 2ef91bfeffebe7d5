//! Catalog ingestion: fetch the set list, read the bulk card dump and rebuild
//! the store in one pass.

use std::{fs::File, io::BufReader, path::Path, time::Duration};

use anyhow::{Context, Result, anyhow};
use cardex_core::{
  card::{RawCard, RawSet, SetList},
  store::{CardStore, IngestReport},
};
use cardex_store_sqlite::SqliteStore;
use reqwest::{Client, header::ACCEPT};

use crate::ServerConfig;

pub const USER_AGENT: &str = concat!("cardex/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the set-list endpoint.
pub fn http_client() -> Result<Client> {
  Client::builder()
    .user_agent(USER_AGENT)
    .timeout(Duration::from_secs(30))
    .build()
    .context("failed to build HTTP client")
}

/// `GET <url>` returning `{"data": [set, ...]}`.
pub async fn fetch_sets(client: &Client, url: &str) -> Result<Vec<RawSet>> {
  let resp = client
    .get(url)
    .header(ACCEPT, "application/json")
    .send()
    .await
    .with_context(|| format!("GET {url} failed"))?;

  if !resp.status().is_success() {
    return Err(anyhow!("GET {url} → {}", resp.status()));
  }
  let list: SetList = resp.json().await.context("deserialising set list")?;
  Ok(list.data)
}

/// Read the bulk card dump: a single JSON array of card objects.
pub fn read_cards(path: &Path) -> Result<Vec<RawCard>> {
  let file = File::open(path)
    .with_context(|| format!("failed to open card file {}", path.display()))?;
  serde_json::from_reader(BufReader::new(file))
    .with_context(|| format!("failed to parse card file {}", path.display()))
}

/// Replace the catalog in `store` with `sets` and the cards in `cards_path`.
pub async fn ingest<S>(
  store: &S,
  sets: Vec<RawSet>,
  cards_path: &Path,
) -> Result<IngestReport>
where
  S: CardStore,
{
  let path = cards_path.to_path_buf();
  let cards = tokio::task::spawn_blocking(move || read_cards(&path))
    .await
    .context("card reader task panicked")??;
  tracing::info!(sets = sets.len(), cards = cards.len(), "source data loaded");

  let report = store
    .rebuild_catalog(sets, cards)
    .await
    .context("catalog rebuild failed; previous catalog kept")?;

  tracing::info!(
    sets = report.sets,
    cards = report.cards,
    unresolved = report.unresolved_cards,
    multi_faced = report.multi_faced,
    elapsed_ms = (report.finished_at - report.started_at).num_milliseconds(),
    "catalog rebuilt"
  );
  Ok(report)
}

/// The `ingest` command: fetch, read and rebuild using `config`.
pub async fn run(config: &ServerConfig) -> Result<IngestReport> {
  let store = SqliteStore::open(&config.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", config.store_path))?;

  tracing::info!(url = %config.sets_url, "fetching set list");
  let sets = fetch_sets(&http_client()?, &config.sets_url).await?;

  ingest(&store, sets, &config.cards_path).await
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use axum::{Router, http::StatusCode, routing::get};
  use cardex_core::filter::CardFilter;
  use tokio::net::TcpListener;

  use super::*;

  fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cardex-ingest-{}-{name}", std::process::id()))
  }

  fn core_set() -> Vec<RawSet> {
    vec![RawSet {
      code:     "m10".into(),
      name:     "Magic 2010".into(),
      set_type: "core".into(),
      block:    None,
    }]
  }

  fn shock() -> RawCard {
    serde_json::from_value(serde_json::json!({
      "name": "Shock",
      "mana_cost": "{R}",
      "type_line": "Instant",
      "set": "m10",
      "color_identity": ["R"],
    }))
    .unwrap()
  }

  /// Serve `body` with `status` at `/sets` on an ephemeral port.
  async fn set_endpoint(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().route("/sets", get(move || async move { (status, body) }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}/sets")
  }

  #[test]
  fn set_list_envelope_parses() {
    let list: SetList = serde_json::from_str(
      r#"{
        "object": "list",
        "has_more": false,
        "data": [
          { "code": "m10", "name": "Magic 2010", "set_type": "core", "card_count": 249 },
          { "code": "zen", "name": "Zendikar", "set_type": "expansion", "block": "Zendikar" }
        ]
      }"#,
    )
    .unwrap();

    assert_eq!(list.data.len(), 2);
    assert_eq!(list.data[0].block, None);
    assert_eq!(list.data[1].block.as_deref(), Some("Zendikar"));
  }

  #[tokio::test]
  async fn fetch_sets_reads_envelope() {
    let url = set_endpoint(
      StatusCode::OK,
      r#"{"data": [{ "code": "m10", "name": "Magic 2010", "set_type": "core" }]}"#,
    )
    .await;

    let sets = fetch_sets(&http_client().unwrap(), &url).await.unwrap();
    assert_eq!(sets, core_set());
  }

  #[tokio::test]
  async fn fetch_sets_rejects_error_status() {
    let url = set_endpoint(StatusCode::SERVICE_UNAVAILABLE, "try later").await;

    let err = fetch_sets(&http_client().unwrap(), &url).await.unwrap_err();
    assert!(err.to_string().contains("503"), "{err}");
  }

  #[tokio::test]
  async fn run_aborts_on_set_list_failure() {
    let store_path = scratch("abort.db");
    {
      let store = SqliteStore::open(&store_path).await.unwrap();
      store.rebuild_catalog(core_set(), vec![shock()]).await.unwrap();
    }

    let config = ServerConfig {
      host:       "127.0.0.1".into(),
      port:       0,
      store_path: store_path.clone(),
      sets_url:   set_endpoint(StatusCode::INTERNAL_SERVER_ERROR, "").await,
      cards_path: scratch("unused.json"),
    };
    let err = run(&config).await.unwrap_err();
    assert!(err.to_string().contains("500"), "{err}");

    let store = SqliteStore::open(&store_path).await.unwrap();
    let found = store.search(&CardFilter::default()).await.unwrap();
    drop(store);
    for suffix in ["", "-wal", "-shm"] {
      std::fs::remove_file(format!("{}{suffix}", store_path.display())).ok();
    }
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].card.name, "Shock");
  }

  #[test]
  fn missing_card_file_is_an_error() {
    let err = read_cards(&scratch("absent.json")).unwrap_err();
    assert!(err.to_string().contains("failed to open card file"));
  }

  #[test]
  fn malformed_card_file_is_an_error() {
    let path = scratch("bad.json");
    std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
    let err = read_cards(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(err.to_string().contains("failed to parse card file"));
  }

  #[tokio::test]
  async fn ingest_rebuilds_from_file() {
    let path = scratch("cards.json");
    std::fs::write(
      &path,
      r#"[
        { "name": "Shock", "mana_cost": "{R}", "cmc": 1.0, "type_line": "Instant",
          "set": "m10", "set_name": "Magic 2010", "color_identity": ["R"],
          "prices": { "usd": "0.10" } },
        { "name": "Mystery Card", "mana_cost": "{1}", "set": "xyz" }
      ]"#,
    )
    .unwrap();

    let store = SqliteStore::open_in_memory().await.unwrap();
    let report = ingest(&store, core_set(), &path).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(report.sets, 1);
    assert_eq!(report.cards, 2);
    assert_eq!(report.unresolved_cards, 1);

    let found = store.search(&CardFilter::default()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].card.name, "Shock");
  }

  #[tokio::test]
  async fn failed_ingest_keeps_previous_catalog() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.rebuild_catalog(core_set(), vec![shock()]).await.unwrap();

    let err = ingest(&store, vec![], &scratch("nope.json")).await.unwrap_err();
    assert!(err.to_string().contains("failed to open card file"));
    assert_eq!(store.search(&CardFilter::default()).await.unwrap().len(), 1);
  }
}
