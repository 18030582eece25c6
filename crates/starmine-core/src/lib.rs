//! Core types for the starmine forum miner.
//!
//! This crate is free of HTTP and HTML dependencies. It defines the records
//! both pipelines produce, the date normalizer they share, and the [`Fetch`]
//! seam the network layer plugs into.
//!
//! [`Fetch`]: fetch::Fetch

pub mod date;
pub mod error;
pub mod fetch;
pub mod stats;
pub mod thread;

pub use error::{Error, Result};
