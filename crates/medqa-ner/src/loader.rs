//! Pattern source loader.
//!
//! Reads the entity catalogue exported from the knowledge graph: JSON Lines,
//! one `{"name": "...", "type": "..."}` object per line. Unreadable records
//! are skipped with a warning and never abort the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use medqa_common::{Category, PatternEntry};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{NerError, Result};

#[derive(Debug, Deserialize)]
struct PatternRecord {
    name: Option<String>,
    #[serde(rename = "type")]
    entity_type: Option<String>,
}

/// Load all pattern entries from a JSONL file.
pub fn load_patterns(path: impl AsRef<Path>) -> Result<Vec<PatternEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(NerError::SourceNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let entries = parse_patterns(BufReader::new(file))?;
    info!("Loaded {} pattern records from {:?}", entries.len(), path);
    Ok(entries)
}

/// Parse JSONL pattern records from any buffered reader.
///
/// Only I/O failures are returned as errors; bad records are logged as
/// [`NerError::MalformedPatternRecord`] and dropped.
pub fn parse_patterns<R: BufRead>(reader: R) -> Result<Vec<PatternEntry>> {
    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_record(trimmed) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                skipped += 1;
                let err = NerError::MalformedPatternRecord { line: line_num, reason };
                warn!(record = trimmed, "Skipping pattern: {}", err);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed pattern record(s)", skipped);
    }
    Ok(entries)
}

fn parse_record(line: &str) -> std::result::Result<PatternEntry, String> {
    let record: PatternRecord =
        serde_json::from_str(line).map_err(|e| format!("invalid JSON ({})", e))?;

    let name = record
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| "missing 'name'".to_string())?;
    let label = record
        .entity_type
        .filter(|t| !t.is_empty())
        .ok_or_else(|| "missing 'type'".to_string())?;
    let category = Category::from_label(&label)
        .ok_or_else(|| format!("unknown type '{}'", label))?;

    Ok(PatternEntry::new(name, category))
}
