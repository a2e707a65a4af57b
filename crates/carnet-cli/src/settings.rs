//! Layered configuration: defaults → TOML file → `CARNET_*` environment.
//!
//! Command-line flags are applied on top by `main`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use carnet_client::{ApiConfig, DEFAULT_BASE_URL};
use carnet_store::StoreConfig;
use serde::Deserialize;

/// Everything the client reads from its config sources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub base_url:         String,
  /// Request timeout; absent means no client-side timeout.
  pub timeout_secs:     Option<u64>,
  pub error_ttl_secs:   u64,
  pub success_ttl_secs: u64,
}

impl Default for Settings {
  fn default() -> Self {
    let store = StoreConfig::default();
    Self {
      base_url:         DEFAULT_BASE_URL.to_owned(),
      timeout_secs:     None,
      error_ttl_secs:   store.error_ttl.as_secs(),
      success_ttl_secs: store.success_ttl.as_secs(),
    }
  }
}

impl Settings {
  /// Load settings. An explicit `path` must exist; the default
  /// `~/.config/carnet/config.toml` is used only if present. The file is
  /// always read as TOML, whatever its extension.
  pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
    Self::load_with_env(path, config::Environment::with_prefix("CARNET"))
  }

  fn load_with_env(path: Option<&Path>, env: config::Environment) -> anyhow::Result<Self> {
    let (file, required) = match path {
      Some(p) => (Some(p.to_path_buf()), true),
      None => (default_path(), false),
    };

    let mut builder = config::Config::builder();
    if let Some(file) = file {
      builder = builder.add_source(
        config::File::from(file)
          .format(config::FileFormat::Toml)
          .required(required),
      );
    }
    builder
      .add_source(env.try_parsing(true))
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("invalid configuration")
  }

  pub fn api_config(&self) -> ApiConfig {
    ApiConfig {
      base_url: self.base_url.clone(),
      timeout:  self.timeout_secs.map(Duration::from_secs),
    }
  }

  pub fn store_config(&self) -> StoreConfig {
    StoreConfig {
      error_ttl:   Duration::from_secs(self.error_ttl_secs),
      success_ttl: Duration::from_secs(self.success_ttl_secs),
    }
  }
}

fn default_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("carnet").join("config.toml"))
}
