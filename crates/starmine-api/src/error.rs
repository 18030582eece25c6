//! Error types for `starmine-api`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("GET {url} → {status}")]
  Status { url: String, status: u16 },

  #[error("malformed payload: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("thread {0} has no mined records to reconcile")]
  NoRecords(u64),

  #[error(
    "mismatch between API's reported question vote and mined voting score \
     ({api:?} vs. {mined})"
  )]
  ScoreMismatch { api: Option<i64>, mined: i64 },

  #[error("day offset {next} visited after {previous}; offsets must decrease")]
  OutOfOrder { previous: u32, next: u32 },

  #[error(transparent)]
  Core(#[from] starmine_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
