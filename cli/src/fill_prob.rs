use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mm_core::strategy::FillProbTable;
use serde::Deserialize;

#[derive(Deserialize)]
struct SampleFile {
    samples: Vec<(i64, f64)>,
}

/// Loads a trained fill-probability table from disk. Missing or malformed
/// files are a hard error for `--strategy ev`: the strategy has no sane
/// fallback curve to quote from.
pub fn load(path: &Path) -> Result<FillProbTable> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading fill-probability table {}", path.display()))?;
    let parsed: SampleFile =
        serde_json::from_str(&raw).with_context(|| format!("parsing fill-probability table {}", path.display()))?;
    Ok(FillProbTable::from_samples(parsed.samples))
}
