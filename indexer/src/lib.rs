use anyhow::{Context, Result};
use search_core::{Engine, EngineConfig, EngineError};
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    /// Files skipped because they could not be read, were not UTF-8 or their
    /// identity was taken.
    pub skipped: Vec<String>,
}

/// Read an engine config from a JSON file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config = EngineConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// Upload every `.txt` file under `dir`. The identity of each document is its
/// path relative to `dir`, with `/` separators.
pub fn load_text_dir(engine: &Engine, dir: &Path) -> Result<LoadReport> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }
    let mut report = LoadReport::default();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                if let Some(p) = err.path() {
                    report.skipped.push(doc_id(dir, p));
                }
                continue;
            }
        };
        let p = entry.path();
        if entry.file_type().is_dir() || p.extension().and_then(|s| s.to_str()) != Some("txt") {
            continue;
        }
        let id = doc_id(dir, p);
        let bytes = match fs::read(p) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%id, error = %err, "skipping unreadable file");
                report.skipped.push(id);
                continue;
            }
        };
        match engine.upload(id.clone(), &bytes) {
            Ok(_) => report.loaded += 1,
            Err(err @ (EngineError::Encoding(_) | EngineError::DuplicateId(_))) => {
                tracing::warn!(%id, error = %err, "skipping file");
                report.skipped.push(id);
            }
            Err(err) => return Err(err.into()),
        }
    }
    tracing::info!(dir = %dir.display(), loaded = report.loaded, skipped = report.skipped.len(), "loaded text directory");
    Ok(report)
}

fn doc_id(root: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(root).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
