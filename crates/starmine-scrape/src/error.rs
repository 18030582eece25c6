//! Error types for the thread extractor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid selector {selector:?}: {reason}")]
  Selector { selector: String, reason: String },

  #[error("invalid author-link pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error("page is not a question (title {0:?})")]
  NotAQuestion(Option<String>),

  #[error(
    "recorded times and author links do not match up ({times} vs. {authors})"
  )]
  ShapeMismatch { times: usize, authors: usize },

  #[error("more votes than recorded user actions ({votes} vs. {times})")]
  SurplusVotes { votes: usize, times: usize },

  #[error("no recorded user actions")]
  EmptyThread,

  #[error("first recorded time is an edit")]
  OpensWithEdit,

  #[error("first recorded time is a comment")]
  OpensWithComment,

  #[error(transparent)]
  Core(#[from] starmine_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
