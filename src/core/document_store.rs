use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::core::path_utils::VAULT_PATH_SEPARATOR;

/*
 * This module provides access to the documents of a vault. It defines errors
 * specific to document I/O, a trait `DocumentStoreOperations` that the sync
 * orchestrator depends on, and a concrete implementation `CoreDocumentStore`
 * backed by a directory on disk.
 *
 * Documents are addressed by vault paths: `/`-separated strings relative to
 * the vault root, such as `notes/daily/today.md`.
 */

/*
 * Defines custom error types for document operations.
 */
#[derive(Debug)]
pub enum DocumentStoreError {
    Io(io::Error),
    IgnoreError(ignore::Error),
    InvalidPath(String),
}

impl From<io::Error> for DocumentStoreError {
    fn from(err: io::Error) -> Self {
        DocumentStoreError::Io(err)
    }
}

impl From<ignore::Error> for DocumentStoreError {
    fn from(err: ignore::Error) -> Self {
        DocumentStoreError::IgnoreError(err)
    }
}

impl std::fmt::Display for DocumentStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStoreError::Io(e) => write!(f, "I/O error: {e}"),
            DocumentStoreError::IgnoreError(e) => write!(f, "Vault walk error: {e}"),
            DocumentStoreError::InvalidPath(p) => write!(f, "Invalid vault path: {p:?}"),
        }
    }
}

impl std::error::Error for DocumentStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentStoreError::Io(e) => Some(e),
            DocumentStoreError::IgnoreError(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DocumentStoreError>;

/*
 * Defines the operations the orchestrator needs from the host's document
 * storage: reading and writing a single document, and enumerating all of them.
 */
pub trait DocumentStoreOperations: Send + Sync {
    fn read(&self, path: &str) -> Result<String>;
    fn write(&self, path: &str, text: &str) -> Result<()>;
    /*
     * Lists every document in the vault as vault paths, sorted.
     */
    fn list_all_documents(&self) -> Result<Vec<String>>;
}

/*
 * A `DocumentStoreOperations` implementation over a directory. Hidden entries
 * (such as the editor's own `.obsidian` folder) and paths excluded by ignore
 * files are skipped; only files with one of the configured extensions count
 * as documents.
 */
pub struct CoreDocumentStore {
    root: PathBuf,
    extensions: Vec<String>,
}

impl CoreDocumentStore {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        CoreDocumentStore {
            root: root.into(),
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| *allowed == ext))
    }

    /*
     * Maps a vault path onto the file system. Empty segments, `.` and `..`
     * are rejected so a vault path can never escape the root.
     */
    fn resolve(&self, vault_path: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for segment in vault_path.split(VAULT_PATH_SEPARATOR) {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                return Err(DocumentStoreError::InvalidPath(vault_path.to_string()));
            }
            resolved.push(segment);
        }
        Ok(resolved)
    }

    fn to_vault_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
                _ => return None,
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(segments.join(&VAULT_PATH_SEPARATOR.to_string()))
    }
}

impl DocumentStoreOperations for CoreDocumentStore {
    fn read(&self, path: &str) -> Result<String> {
        let full_path = self.resolve(path)?;
        log::trace!("CoreDocumentStore: Reading {full_path:?}");
        Ok(fs::read_to_string(full_path)?)
    }

    fn write(&self, path: &str, text: &str) -> Result<()> {
        let full_path = self.resolve(path)?;
        log::debug!("CoreDocumentStore: Writing {} bytes to {full_path:?}", text.len());
        fs::write(full_path, text)?;
        Ok(())
    }

    fn list_all_documents(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Err(DocumentStoreError::InvalidPath(
                self.root.to_string_lossy().into_owned(),
            ));
        }
        log::debug!("CoreDocumentStore: Listing documents under {:?}", self.root);

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(true)
            .git_global(false)
            .hidden(true)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let mut documents = Vec::new();
        for entry_result in walker {
            let entry = entry_result?;
            let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
            if !is_file || !self.is_document(entry.path()) {
                continue;
            }
            match self.to_vault_path(entry.path()) {
                Some(vault_path) => documents.push(vault_path),
                None => log::warn!(
                    "CoreDocumentStore: Skipping {:?}, not representable as a vault path.",
                    entry.path()
                ),
            }
        }
        documents.sort();
        log::debug!("CoreDocumentStore: Found {} documents.", documents.len());
        Ok(documents)
    }
}
