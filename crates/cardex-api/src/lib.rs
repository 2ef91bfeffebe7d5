//! JSON REST API for Cardex.
//!
//! Exposes an axum [`Router`] backed by any [`cardex_core::store::CardStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cardex_api::api_router(store.clone()))
//! ```

pub mod cards;
pub mod error;
pub mod game;

use std::sync::Arc;

use axum::{Router, routing::get};
use cardex_core::store::CardStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CardStore + 'static,
{
  Router::new()
    .route("/cards", get(cards::search::<S>))
    .route("/random-card-art", get(game::random_art::<S>))
    .route("/suggestions", get(game::suggestions::<S>))
    .with_state(store)
}
