//! Mapping edits supplied on the command line.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use universe_map::MappingState;

/// One requested change to a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingEdit {
    Set { header: String, field: String },
    Unset { header: String },
}

/// Parses `HEADER=FIELD`. The last `=` separates the two, so headers may
/// contain `=`.
pub fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    let (header, field) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected HEADER=FIELD, got '{raw}'"))?;
    let field = field.trim();
    if header.is_empty() || field.is_empty() {
        return Err(format!("expected HEADER=FIELD, got '{raw}'"));
    }
    Ok((header.to_string(), field.to_string()))
}

/// Reads a JSON object of header to field value (or `null` to clear).
pub fn load_mapping_file(path: &Path) -> Result<Vec<MappingEdit>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read mapping file {}", path.display()))?;
    let entries: BTreeMap<String, Option<String>> = serde_json::from_str(&contents)
        .with_context(|| format!("parse mapping file {}", path.display()))?;
    Ok(entries
        .into_iter()
        .map(|(header, field)| match field {
            Some(field) => MappingEdit::Set { header, field },
            None => MappingEdit::Unset { header },
        })
        .collect())
}

/// Collects edits in application order: file entries, then sets, then unsets.
pub fn collect_edits(
    file: Option<&Path>,
    sets: &[(String, String)],
    unsets: &[String],
) -> Result<Vec<MappingEdit>> {
    let mut edits = match file {
        Some(path) => load_mapping_file(path)?,
        None => Vec::new(),
    };
    edits.extend(sets.iter().map(|(header, field)| MappingEdit::Set {
        header: header.clone(),
        field: field.clone(),
    }));
    edits.extend(unsets.iter().map(|header| MappingEdit::Unset {
        header: header.clone(),
    }));
    Ok(edits)
}

/// Applies edits in order, stopping at the first rejected one.
pub fn apply_edits(state: &mut MappingState, edits: &[MappingEdit]) -> Result<()> {
    for edit in edits {
        match edit {
            MappingEdit::Set { header, field } => {
                state
                    .set_mapping(header, Some(field))
                    .with_context(|| format!("map '{header}' to '{field}'"))?;
            }
            MappingEdit::Unset { header } => {
                state
                    .set_mapping(header, None)
                    .with_context(|| format!("unmap '{header}'"))?;
            }
        }
    }
    Ok(())
}

/// Parses a single-byte delimiter.
pub fn parse_delimiter(raw: &str) -> std::result::Result<u8, String> {
    let delimiter = match raw {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match delimiter.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(format!("delimiter must be a single ASCII character, got '{raw}'")),
    }
}

/// Rejects zero batch sizes.
pub fn parse_batch_size(raw: &str) -> std::result::Result<usize, String> {
    let size: usize = raw
        .parse()
        .map_err(|_| format!("invalid batch size '{raw}'"))?;
    if size == 0 {
        return Err("batch size must be at least 1".to_string());
    }
    Ok(size)
}
