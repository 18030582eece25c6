//! Run settings: an optional TOML file overlaid with `STARMINE_*` variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;
use starmine_api::ClientConfig;

const DEFAULT_BASE_URL: &str = "http://www.biostars.org";
const DEFAULT_TIMEOUT_SECS: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
  /// Site root; thread pages and API paths are joined onto it.
  pub base_url:     String,
  /// Directory the two TSV files are created in.
  pub output_dir:   PathBuf,
  pub user_agent:   String,
  pub timeout_secs: u64,
}

impl RunConfig {
  /// Read `path` if it exists, then the environment, over built-in defaults.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("base_url", DEFAULT_BASE_URL)?
      .set_default("output_dir", ".")?
      .set_default("user_agent", ClientConfig::default().user_agent)?
      .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("STARMINE"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise RunConfig")
  }

  pub fn client(&self) -> ClientConfig {
    ClientConfig {
      user_agent: self.user_agent.clone(),
      timeout:    Duration::from_secs(self.timeout_secs),
    }
  }
}
