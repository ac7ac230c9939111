/*
 * This module defines the `ExplorerUiState` struct, the application logic's
 * mirror of what the host is currently showing: the entries of the file
 * explorer and the focused document. The orchestrator consults it to decide
 * which explorer labels to repaint and which count the status indicator shows.
 */
use crate::core::path_utils;
use crate::platform_layer::ExplorerItem;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct ExplorerUiState {
    /* Visible explorer entries keyed by vault path; the value is true for folders. */
    items: BTreeMap<String, bool>,
    /* The focused document, if any. */
    pub active_document: Option<String>,
}

impl ExplorerUiState {
    pub fn new() -> Self {
        log::debug!("ExplorerUiState::new called.");
        ExplorerUiState::default()
    }

    // Replaces the mirrored entries with the host's current listing.
    pub fn replace_items(&mut self, items: Vec<ExplorerItem>) {
        self.items = items
            .into_iter()
            .map(|item| (item.path, item.is_folder))
            .collect();
        log::debug!("ExplorerUiState: Now tracking {} explorer entries.", self.item_count());
    }

    /*
     * Records a document that appeared in the vault, together with any
     * ancestor folders the explorer did not show yet. Existing entries keep
     * their kind.
     */
    pub fn insert_document(&mut self, path: &str) {
        for folder in path_utils::ancestor_folders(path) {
            self.items.entry(folder.to_string()).or_insert(true);
        }
        self.items.entry(path.to_string()).or_insert(false);
    }

    pub fn remove_item(&mut self, path: &str) -> bool {
        self.items.remove(path).is_some()
    }

    /*
     * Returns the entries whose label must be repainted, in path order. With
     * no changed path this is every entry; otherwise only the changed path
     * itself and its ancestor folders.
     */
    pub fn items_to_repaint(&self, changed_path: Option<&str>) -> Vec<ExplorerItem> {
        self.items
            .iter()
            .filter(|(path, _)| {
                changed_path.is_none_or(|changed| path_utils::is_self_or_ancestor(path, changed))
            })
            .map(|(path, is_folder)| ExplorerItem {
                path: path.clone(),
                is_folder: *is_folder,
            })
            .collect()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/*
 * Builds the explorer listing for a set of documents: every document as a
 * file entry and every ancestor folder once, sorted by path.
 */
pub fn explorer_items_from_documents(documents: &[String]) -> Vec<ExplorerItem> {
    let mut state = ExplorerUiState::default();
    for document in documents {
        state.insert_document(document);
    }
    state.items_to_repaint(None)
}
