use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use folio_core::{ExtractionResponse, NormalizedData, NormalizedRow};
use folio_export::{decode_header_extract, export_to_csv, project_statement, RawExtraction};
use folio_ingest::{normalize_response_with, TracingObserver};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod state;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FOLIO_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "folio", version = VERSION, about = "Normalize brokerage statement tables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize extraction JSON files into positions/transactions/fees CSVs
    Normalize {
        /// Extraction response JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory for CSV files (default: config output.dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print the normalized buckets as JSON instead of writing CSVs
        #[arg(long)]
        json: bool,
    },

    /// Print a display summary of one extraction JSON file
    Summary {
        file: PathBuf,

        /// Header-extract JSON to fill in account and period details
        #[arg(long)]
        header: Option<PathBuf>,
    },

    /// Manage ~/.folio/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: String,
    generated_at: String,
    #[serde(flatten)]
    data: &'a NormalizedData,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = config::load_config();

    let filter = match &loaded {
        Ok(cfg) => cfg.log.filter.clone(),
        Err(_) => config::LogSection::default().filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // `config init`/`show` must still work when the file on disk is broken.
    let cfg = effective_config(loaded, matches!(cli.command, Command::Config { .. }))?;

    match cli.command {
        Command::Normalize {
            files,
            out_dir,
            json,
        } => {
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from(&cfg.output.dir));
            let mut reports = Vec::new();

            for file in &files {
                let resp: ExtractionResponse = read_json(file).await?;
                if resp.status != "success" && !resp.status.is_empty() {
                    warn!(
                        file = %file.display(),
                        status = %resp.status,
                        message = resp.message.as_deref().unwrap_or(""),
                        "extraction did not report success"
                    );
                }

                let mut observer = TracingObserver::new(file.display().to_string());
                let data = normalize_response_with(&resp, &mut observer);

                if json {
                    reports.push((file.display().to_string(), data));
                    continue;
                }

                write_buckets(file, &data, &out_dir, cfg.output.write_empty).await?;
                print_summary(file, &data);
            }

            if json {
                let generated_at = chrono::Utc::now().to_rfc3339();
                let out: Vec<JsonReport> = reports
                    .iter()
                    .map(|(source, data)| JsonReport {
                        source: source.clone(),
                        generated_at: generated_at.clone(),
                        data,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
        }

        Command::Summary { file, header } => {
            let raw: RawExtraction = read_json(&file).await?;
            let mut view = project_statement(&raw);

            if let Some(header_path) = header {
                let s = tokio::fs::read_to_string(&header_path)
                    .await
                    .with_context(|| format!("read {}", header_path.display()))?;
                let header = decode_header_extract(&s)
                    .with_context(|| format!("decoding {}", header_path.display()))?;
                view = view.with_header(header);
            }

            println!("{}", serde_json::to_string_pretty(&view)?);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg)?);
            }
        },
    }

    Ok(())
}

fn effective_config(loaded: Result<config::Config>, lenient: bool) -> Result<config::Config> {
    match loaded {
        Ok(cfg) => Ok(cfg),
        Err(e) if lenient => {
            warn!("ignoring unreadable config, using defaults: {e:#}");
            Ok(config::Config::default())
        }
        Err(e) => Err(e),
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let s = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing {}", path.display()))
}

/// `statement.json` -> `statement.positions.csv` etc.
fn bucket_path(input: &Path, out_dir: &Path, bucket: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string());
    out_dir.join(format!("{stem}.{bucket}.csv"))
}

async fn write_buckets(
    input: &Path,
    data: &NormalizedData,
    out_dir: &Path,
    write_empty: bool,
) -> Result<()> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("create {}", out_dir.display()))?;

    let buckets: [(&str, &[NormalizedRow]); 3] = [
        ("positions", &data.positions),
        ("transactions", &data.transactions),
        ("fees", &data.fees),
    ];

    for (name, rows) in buckets {
        if rows.is_empty() && !write_empty {
            continue;
        }
        let path = bucket_path(input, out_dir, name);
        tokio::fs::write(&path, export_to_csv(rows))
            .await
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rows = rows.len(), "wrote {name}");
    }

    Ok(())
}

fn print_summary(input: &Path, data: &NormalizedData) {
    println!("{}", input.display());
    println!(
        "  positions={} transactions={} fees={}",
        data.positions.len(),
        data.transactions.len(),
        data.fees.len()
    );
    if data.is_empty() {
        println!("  (no tables recognized)");
    }
}
