//! The `Fetch` trait and the forum's endpoint layout.
//!
//! The trait is implemented by the network layer (`starmine-api`'s
//! `HttpFetcher`) and by in-memory fakes in tests. Both pipelines depend on
//! this abstraction, not on a concrete client.

use std::{borrow::Cow, future::Future};

use crate::{Error, Result};

// ─── Fetch result ────────────────────────────────────────────────────────────

/// A fetched resource: the URL it finally resolved to, and its body.
#[derive(Debug, Clone)]
pub struct Fetched {
  pub url:  String,
  pub body: Vec<u8>,
}

impl Fetched {
  /// Fail with [`Error::Redirected`] unless the fetch resolved to
  /// `requested` itself.
  pub fn ensure_canonical(&self, requested: &str) -> Result<()> {
    if self.url == requested {
      Ok(())
    } else {
      Err(Error::Redirected {
        requested: requested.to_string(),
        resolved:  self.url.clone(),
      })
    }
  }

  /// The body as text, replacing invalid UTF-8.
  pub fn text(&self) -> Cow<'_, str> { String::from_utf8_lossy(&self.body) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Retrieves a URL, following redirects.
pub trait Fetch: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<Fetched, Self::Error>> + Send + 'a;
}

// ─── Endpoints ───────────────────────────────────────────────────────────────

/// URL builder for the forum's pages and API.
#[derive(Debug, Clone)]
pub struct Endpoints {
  base: String,
}

impl Endpoints {
  pub fn new(base_url: &str) -> Self {
    Self {
      base: base_url.trim_end_matches('/').to_string(),
    }
  }

  /// `GET /p/{id}/`, the rendered thread.
  pub fn thread_page(&self, id: u64) -> String {
    format!("{}/p/{id}/", self.base)
  }

  /// `GET /api/post/{id}/`
  pub fn post_summary(&self, id: u64) -> String {
    format!("{}/api/post/{id}/", self.base)
  }

  /// `GET /api/stats/{age}/`, age in days.
  pub fn daily_stats(&self, age: u32) -> String {
    format!("{}/api/stats/{age}/", self.base)
  }
}
