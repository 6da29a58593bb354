use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_folio_home, folio_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Where CSV files go when `--out-dir` is not given
    pub dir: String,
    /// Write header-less empty files for empty buckets too
    pub write_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// EnvFilter directive used when RUST_LOG is unset
    pub filter: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            write_empty: false,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "folio=info,folio_ingest=info".to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(folio_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_folio_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}
