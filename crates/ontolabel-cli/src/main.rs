//! ontolabel binary.
//!
//! Resolves ontology CURIEs to their canonical labels through the
//! multi-level label cache, querying the EBI Ontology Lookup Service for
//! anything not already cached. Reads `ontolabel.toml` (or the path
//! given with `--config`) plus `ONTOLABEL_*` environment variables;
//! command-line flags override both.

mod client;

use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use ontolabel_core::Curie;
use ontolabel_resolver::{Resolver, ResolverConfig};
use ontolabel_store_csv::{CsvStore, CsvStoreConfig};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::client::OlsClient;

#[derive(Parser)]
#[command(author, version, about = "Resolve ontology CURIEs to canonical labels")]
struct Cli {
  /// CURIEs to resolve, e.g. GO:0008150.
  #[arg(required = true)]
  curies: Vec<String>,

  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "ontolabel.toml")]
  config: PathBuf,

  /// Root directory for the persistent label cache.
  #[arg(long)]
  cache_dir: Option<PathBuf>,

  /// Disable the persistent cache (in-run deduplication still applies).
  #[arg(long)]
  no_cache: bool,

  /// Per-lookup timeout in seconds.
  #[arg(long)]
  timeout_secs: Option<u64>,

  /// Emit results as a JSON array instead of tab-separated lines.
  #[arg(long)]
  json: bool,
}

/// Settings read from `ontolabel.toml` / `ONTOLABEL_*` environment
/// variables, before command-line overrides.
#[derive(Debug, Clone, Deserialize)]
struct Settings {
  #[serde(default = "default_cache_dir")]
  cache_dir: PathBuf,

  #[serde(default = "default_cache_enabled")]
  cache_enabled: bool,

  #[serde(default = "default_timeout_secs")]
  timeout_secs: u64,

  #[serde(default = "default_ols_base_url")]
  ols_base_url: String,
}

fn default_cache_dir() -> PathBuf {
  PathBuf::from("./cache")
}

fn default_cache_enabled() -> bool {
  true
}

fn default_timeout_secs() -> u64 {
  30
}

fn default_ols_base_url() -> String {
  client::DEFAULT_BASE_URL.to_string()
}

#[derive(Serialize)]
struct Resolution<'a> {
  curie: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  label: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  error: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration; flags override file and environment.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("ONTOLABEL"))
    .build()
    .context("failed to read configuration")?;
  let mut settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;

  if let Some(dir) = cli.cache_dir {
    settings.cache_dir = dir;
  }
  if cli.no_cache {
    settings.cache_enabled = false;
  }
  if let Some(secs) = cli.timeout_secs {
    settings.timeout_secs = secs;
  }

  let store = CsvStore::new(CsvStoreConfig {
    root:    settings.cache_dir.clone(),
    enabled: settings.cache_enabled,
  });
  let ols = OlsClient::new(settings.ols_base_url.clone())?;
  let resolver = Resolver::new(
    Arc::new(store),
    Arc::new(ols),
    ResolverConfig {
      timeout: Some(Duration::from_secs(settings.timeout_secs)),
    },
  );

  let mut failures = 0usize;
  let mut results = Vec::with_capacity(cli.curies.len());
  for raw in &cli.curies {
    match resolver.resolve(&Curie::new(raw.clone())).await {
      Ok(label) => results.push(Resolution {
        curie: raw,
        label: Some(label),
        error: None,
      }),
      Err(err) => {
        failures += 1;
        eprintln!("{raw}: {err}");
        results.push(Resolution {
          curie: raw,
          label: None,
          error: Some(err.to_string()),
        });
      }
    }
  }

  if cli.json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  } else {
    for resolution in &results {
      if let Some(label) = &resolution.label {
        println!("{}\t{}", resolution.curie, label);
      }
    }
  }

  Ok(if failures > 0 {
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  })
}
