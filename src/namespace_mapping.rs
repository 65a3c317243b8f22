//! Namespace mapping loader.
//!
//! A mapping translates a namespace URI into the short code used in generated
//! class names. Entries come either inline (`uri=code`) or from a file named
//! with a leading `@`, one entry per line.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// URI to short code. Keys are unique, a later entry replaces an earlier one.
pub type NamespaceMapping = BTreeMap<String, String>;

/// A mapping file could not be read.
#[derive(Debug, Error)]
#[error("Error reading {}: {source}", .path.display())]
pub struct MappingFileError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Splits an entry at its last `=`. URIs may contain `=` themselves.
///
/// Returns `None` when there is no `=` or when either side is empty after
/// trimming.
pub fn parse_entry(entry: &str) -> Option<(&str, &str)> {
    let (uri, code) = entry.rsplit_once('=')?;
    let (uri, code) = (uri.trim(), code.trim());
    if uri.is_empty() || code.is_empty() {
        return None;
    }
    Some((uri, code))
}

/// Adds one `-namespaceMapping` value to `mapping`.
pub fn add_mapping(mapping: &mut NamespaceMapping, value: &str) -> Result<(), MappingFileError> {
    match value.strip_prefix('@') {
        Some(file_name) => load_mapping_file(mapping, Path::new(file_name)),
        None => {
            insert_entry(mapping, value);
            Ok(())
        }
    }
}

/// Reads `uri=code` lines from a file. Blank lines and lines starting with `#`
/// are skipped.
pub fn load_mapping_file(
    mapping: &mut NamespaceMapping,
    path: &Path,
) -> Result<(), MappingFileError> {
    let to_error = |source| MappingFileError {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_error)?;
    log::debug!("Reading namespace mapping from {:?}", path);

    for line in BufReader::new(file).lines() {
        let line = line.map_err(to_error)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        insert_entry(mapping, line);
    }

    Ok(())
}

fn insert_entry(mapping: &mut NamespaceMapping, entry: &str) {
    match parse_entry(entry) {
        Some((uri, code)) => {
            if let Some(previous) = mapping.insert(uri.to_string(), code.to_string()) {
                log::debug!("Namespace {} remapped from {} to {}", uri, previous, code);
            }
        }
        None => log::debug!("Ignoring incomplete namespace mapping {:?}", entry),
    }
}
