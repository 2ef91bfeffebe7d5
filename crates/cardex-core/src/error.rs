//! Error types for `cardex-core`.
//!
//! Every variant is a validation failure of caller-supplied filter input; they
//! are raised before any store is touched.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// `cmc` was not a non-negative integer.
  #[error("Invalid CMC value: {0:?}")]
  InvalidCmc(String),

  /// `colorLogic` was not one of `all`, `exact` or `any`.
  #[error("Invalid color logic value: {0:?}")]
  InvalidColorLogic(String),

  #[error("Invalid color value: {0:?}")]
  InvalidColor(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
