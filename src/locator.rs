//! Source document location.
//!
//! Remote documents are looked up in the import paths first, at
//! `<importpath>/<url-host>/<url-path>`, before falling back to a download.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::Configuration;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<host>[^/:?#]*)(?::\d+)?(?P<path>/[^?#]*)?")
        .expect("URL pattern is valid")
});

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("WSDL file not found: {0}")]
    NotFound(PathBuf),

    #[error("{url} is not available locally and downloads are disabled (looked in: {})", format_candidates(.candidates))]
    RemoteDisabled { url: String, candidates: Vec<PathBuf> },
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    if candidates.is_empty() {
        return "no import paths given".to_string();
    }
    candidates
        .iter()
        .map(|candidate| candidate.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where the WSDL document will be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentLocation {
    Local(PathBuf),
    /// Needs a download, with the client identity if one was configured.
    Remote(String),
}

/// A `scheme://host/path` document reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument<'a> {
    pub scheme: &'a str,
    pub host: &'a str,
    pub path: &'a str,
}

impl<'a> RemoteDocument<'a> {
    pub fn parse(document: &'a str) -> Option<Self> {
        let captures = URL_PATTERN.captures(document)?;
        Some(Self {
            scheme: captures.name("scheme")?.as_str(),
            host: captures.name("host")?.as_str(),
            path: captures.name("path").map_or("", |path| path.as_str()),
        })
    }

    /// Where a local copy is expected below an import path.
    ///
    /// Empty and `.` segments are skipped. A `..` segment yields `None`, since
    /// the candidate must stay inside the import path.
    pub fn import_candidate(&self, import_path: &Path) -> Option<PathBuf> {
        let mut candidate = import_path.to_path_buf();
        let segments = std::iter::once(self.host).chain(self.path.split('/'));
        for segment in segments {
            match segment {
                "" | "." => continue,
                ".." => return None,
                segment => candidate.push(segment),
            }
        }
        Some(candidate)
    }
}

/// Resolves the configured source document.
pub fn locate(config: &Configuration) -> Result<DocumentLocation, LocateError> {
    let document = config.source_document.as_str();

    let Some(remote) = RemoteDocument::parse(document) else {
        return local(Path::new(document));
    };

    if remote.scheme.eq_ignore_ascii_case("file") {
        return local(Path::new(remote.path));
    }

    let candidates: Vec<PathBuf> = config
        .import_paths
        .iter()
        .filter_map(|import_path| remote.import_candidate(import_path))
        .collect();

    if let Some(found) = candidates.iter().find(|candidate| candidate.is_file()) {
        log::debug!("Using local copy {:?} of {}", found, document);
        return Ok(DocumentLocation::Local(found.clone()));
    }

    if config.use_local_files_only {
        return Err(LocateError::RemoteDisabled {
            url: document.to_string(),
            candidates,
        });
    }

    log::debug!("{} will be downloaded", document);
    Ok(DocumentLocation::Remote(document.to_string()))
}

fn local(path: &Path) -> Result<DocumentLocation, LocateError> {
    if path.is_file() {
        Ok(DocumentLocation::Local(path.to_path_buf()))
    } else {
        Err(LocateError::NotFound(path.to_path_buf()))
    }
}
