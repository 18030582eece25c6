//! Error types for `starmine-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unresolvable date phrase: {0:?}")]
  UnresolvedDate(String),

  #[error("{requested} resolved to {resolved}")]
  Redirected { requested: String, resolved: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
