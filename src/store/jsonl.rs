//! JSONL file helpers
//!
//! One record per line. Blank lines are skipped and malformed lines are
//! logged and skipped so a single bad write never hides a whole collection.
//! Skipped lines are kept verbatim and written back on every rewrite.

use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Records of a JSONL file plus the raw text of lines that failed to parse
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub unparsed: Vec<String>,
}

/// Read all lines from a JSONL file and deserialize them
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    load_jsonl(path).map(|loaded| loaded.items)
}

/// Read a JSONL file, keeping malformed lines so a rewrite can preserve them
pub fn load_jsonl<T: DeserializeOwned>(path: &Path) -> AppResult<Loaded<T>> {
    let mut loaded = Loaded {
        items: Vec::new(),
        unparsed: Vec::new(),
    };
    if !path.exists() {
        return Ok(loaded);
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(item) => loaded.items.push(item),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    line = index + 1,
                    "Skipping malformed record: {}",
                    e
                );
                loaded.unparsed.push(line);
            }
        }
    }

    Ok(loaded)
}

/// Append a single item to a JSONL file
pub fn append_jsonl<T: Serialize>(path: &Path, item: &T) -> AppResult<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(item)?;
    writeln!(file, "{}", json)?;
    Ok(())
}

/// Rewrite the entire JSONL file. Writes to a sibling temp file first and
/// renames it over the original so readers never see a half-written file.
/// `unparsed` lines are copied through unchanged after the records.
pub fn write_jsonl<T: Serialize>(path: &Path, items: &[T], unparsed: &[String]) -> AppResult<()> {
    ensure_parent(path)?;
    let tmp_path = path.with_extension("jsonl.tmp");

    {
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        for item in items {
            let json = serde_json::to_string(item)?;
            writeln!(writer, "{}", json)?;
        }
        for line in unparsed {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        AppError::storage("Failed to replace collection file").with_details(e.to_string())
    })
}

fn ensure_parent(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
