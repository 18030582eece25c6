//! The forum's read-only API: payloads, reconciliation and history.
//!
//! - [`payload`]: typed views of `GET /api/post/{id}/` and
//!   `GET /api/stats/{age}/`.
//! - [`reconcile`]: cross-checks mined thread records against the post API.
//! - [`history`]: folds daily stats snapshots through the shared age tables.
//! - [`client`]: the reqwest-backed [`Fetch`](starmine_core::fetch::Fetch)
//!   implementation.

pub mod client;
pub mod error;
pub mod history;
pub mod payload;
pub mod reconcile;

pub use client::{ClientConfig, HttpFetcher};
pub use error::{Error, Result};
pub use history::{HistoryWalk, aggregate, day_offsets};
pub use reconcile::{AnswerCount, Reconciled, reconcile};
