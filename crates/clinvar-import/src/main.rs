//! clinvar-import binary.
//!
//! Reads `clinvar-import.toml` (or the path given with `--config`), loads the
//! significance term map, and imports each `ClinVarFullRelease_<YYYY>-<MM>.xml`
//! file given on the command line into the SQLite database.
//!
//! ```
//! cargo run -p clinvar-import -- ClinVarFullRelease_2020-05.xml ClinVarFullRelease_2020-06.xml
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use clinvar_core::TermNormalizer;
use clinvar_import::{ImportConfig, Importer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: clinvar-import ClinVarFullRelease_<year>-<month>.xml ...";

#[derive(Parser)]
#[command(author, version, about = "Import ClinVar full-release XML into SQLite")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "clinvar-import.toml")]
  config: PathBuf,

  /// SQLite database to import into (overrides the config file).
  #[arg(long)]
  database: Option<PathBuf>,

  /// Significance term map TSV (overrides the config file).
  #[arg(long)]
  terms: Option<PathBuf>,

  /// Release files to import, in order.
  #[arg(value_name = "FILE")]
  files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.files.is_empty() {
    println!("{USAGE}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CLINVAR"))
    .build()
    .context("failed to read config file")?;

  let mut import_cfg: ImportConfig = settings
    .try_deserialize()
    .context("failed to deserialise ImportConfig")?;

  if let Some(database) = cli.database {
    import_cfg.database_path = database;
  }
  if let Some(terms) = cli.terms {
    import_cfg.terms_path = terms;
  }

  let normalizer = TermNormalizer::from_path(&import_cfg.terms_path)
    .context("failed to load significance term map")?;
  tracing::debug!(terms = normalizer.len(), "loaded significance term map");

  Importer::new(import_cfg, normalizer)
    .run(&cli.files)
    .await?;

  Ok(())
}
