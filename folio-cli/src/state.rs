use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$FOLIO_HOME`, else `~/.folio`.
pub fn folio_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FOLIO_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".folio"))
}

pub fn ensure_folio_home() -> Result<PathBuf> {
    let dir = folio_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
