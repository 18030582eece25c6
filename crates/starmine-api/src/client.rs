//! HTTP fetcher for the forum's pages and API.

use std::time::Duration;

use reqwest::Client;
use starmine_core::fetch::{Fetch, Fetched};

use crate::{Error, Result};

/// Connection settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub user_agent: String,
  pub timeout:    Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      user_agent: concat!("starmine/", env!("CARGO_PKG_VERSION")).to_string(),
      timeout:    Duration::from_secs(30),
    }
  }
}

/// Fetches one URL per call, following redirects, so callers can compare the
/// resolved URL with the one they asked for.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new(config: &ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .user_agent(config.user_agent.clone())
      .build()?;
    Ok(Self { client })
  }
}

impl Fetch for HttpFetcher {
  type Error = Error;

  async fn fetch(&self, url: &str) -> Result<Fetched> {
    let resp = self.client.get(url).send().await?;

    if !resp.status().is_success() {
      return Err(Error::Status {
        url:    url.to_string(),
        status: resp.status().as_u16(),
      });
    }

    let resolved = resp.url().to_string();
    let body = resp.bytes().await?.to_vec();
    Ok(Fetched {
      url: resolved,
      body,
    })
  }
}
