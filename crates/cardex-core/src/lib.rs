//! Core types and logic for the Cardex card catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the card model, the normalizer that flattens raw card records, filter
//! validation, and the structured predicate builder. Storage backends render
//! its statements; they never assemble SQL from user input themselves.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod card;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod predicate;
pub mod query;
pub mod render;
pub mod store;

pub use error::{Error, Result};
