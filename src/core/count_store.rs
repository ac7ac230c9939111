/*
 * This module defines the `CountStore`, the in-memory record of character
 * counts for every tracked document and every folder above them.
 *
 * Folder totals are never recomputed from the file map. Each mutation computes
 * the change in a single file's count and adds that delta to each ancestor
 * folder, which keeps every folder equal to the sum of the files beneath it.
 * Paths are opaque `/`-separated strings; callers supply canonical paths.
 */
use crate::core::char_counter::CharacterCounterOperations;
use crate::core::path_utils;
use std::collections::HashMap;
use std::sync::Arc;

/*
 * Owns the file and folder count maps. The maps are populated by `initialize`
 * at startup, mutated incrementally afterwards and never persisted.
 */
pub struct CountStore {
    counter: Arc<dyn CharacterCounterOperations>,
    file_counts: HashMap<String, usize>,
    folder_counts: HashMap<String, i64>,
}

impl CountStore {
    pub fn new(counter: Arc<dyn CharacterCounterOperations>) -> Self {
        log::debug!("CountStore::new called - initializing empty count maps.");
        CountStore {
            counter,
            file_counts: HashMap::new(),
            folder_counts: HashMap::new(),
        }
    }

    /*
     * Rebuilds both maps from a full set of documents. Each document's count is
     * replayed as a delta along its ancestors, so duplicate paths in the input
     * still leave the maps consistent (the last text wins).
     */
    pub fn initialize<I, P, T>(&mut self, documents: I)
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: AsRef<str>,
    {
        self.file_counts.clear();
        self.folder_counts.clear();
        for (path, text) in documents {
            self.recalculate(path.into(), text.as_ref());
        }
        log::debug!(
            "CountStore: Initialized {} files across {} folders.",
            self.file_counts.len(),
            self.folder_counts.len()
        );
    }

    /*
     * Recounts `path` from `text`, stores the new count and propagates the
     * difference to every ancestor folder. Returns that difference; zero means
     * nothing visible changed.
     */
    pub fn recalculate(&mut self, path: impl Into<String>, text: &str) -> i64 {
        let path = path.into();
        let new_count = self.counter.count_characters(text);
        let old_count = self.file_counts.insert(path.clone(), new_count).unwrap_or(0);
        let delta = new_count as i64 - old_count as i64;
        log::trace!("CountStore: Recalculated {path:?}: {old_count} -> {new_count} (delta {delta}).");
        self.propagate_to_ancestors(&path, delta);
        delta
    }

    /*
     * Stops tracking `path`. An untracked path, or one whose count is zero, is
     * left as it is and 0 is returned; a zero count contributes nothing to any
     * folder, so there is nothing to remove. Otherwise returns the negative of
     * the removed count.
     */
    pub fn remove(&mut self, path: &str) -> i64 {
        let count = match self.file_counts.get(path) {
            Some(&count) if count > 0 => count,
            _ => {
                log::trace!("CountStore: Nothing to remove for {path:?}.");
                return 0;
            }
        };
        self.file_counts.remove(path);
        let delta = -(count as i64);
        self.propagate_to_ancestors(path, delta);
        log::trace!("CountStore: Removed {path:?} ({count} characters).");
        delta
    }

    /*
     * Moves a document: drops `old_path` (even when its count is zero) and
     * then runs `recalculate(new_path, text)`. Returns the delta applied to
     * the new path.
     */
    pub fn rename(&mut self, old_path: &str, new_path: impl Into<String>, text: &str) -> i64 {
        if let Some(old_count) = self.file_counts.remove(old_path) {
            self.propagate_to_ancestors(old_path, -(old_count as i64));
            log::trace!("CountStore: Moved out {old_path:?} ({old_count} characters).");
        }
        self.recalculate(new_path, text)
    }

    pub fn propagate_to_ancestors(&mut self, path: &str, delta: i64) {
        for folder in path_utils::ancestor_folders(path) {
            *self.folder_counts.entry(folder.to_string()).or_insert(0) += delta;
        }
    }

    pub fn file_count(&self, path: &str) -> Option<usize> {
        self.file_counts.get(path).copied()
    }

    pub fn folder_count(&self, path: &str) -> Option<i64> {
        self.folder_counts.get(path).copied()
    }

    /*
     * The count shown next to an explorer entry: the file count if `path` is a
     * tracked file, otherwise the folder total, otherwise 0.
     */
    pub fn display_count(&self, path: &str) -> i64 {
        self.file_count(path)
            .map(|count| count as i64)
            .or_else(|| self.folder_count(path))
            .unwrap_or(0)
    }

    pub fn tracked_file_count(&self) -> usize {
        self.file_counts.len()
    }

    #[cfg(test)]
    pub(crate) fn file_counts(&self) -> &HashMap<String, usize> {
        &self.file_counts
    }

    #[cfg(test)]
    pub(crate) fn folder_counts(&self) -> &HashMap<String, i64> {
        &self.folder_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::char_counter::{MarkdownCharacterCounter, PlainCharacterCounter};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn plain_store() -> CountStore {
        CountStore::new(Arc::new(PlainCharacterCounter::new()))
    }

    // Recomputes every folder total from scratch and compares with the store.
    fn assert_folders_match_files(store: &CountStore) {
        let mut expected: HashMap<String, i64> = HashMap::new();
        for (path, count) in store.file_counts() {
            for folder in path_utils::ancestor_folders(path) {
                *expected.entry(folder.to_string()).or_insert(0) += *count as i64;
            }
        }
        for (folder, count) in store.folder_counts() {
            assert_eq!(
                expected.get(folder).copied().unwrap_or(0),
                *count,
                "folder {folder:?} out of sync"
            );
        }
        for folder in expected.keys() {
            assert!(store.folder_counts().contains_key(folder));
        }
    }

    #[test]
    fn test_initialize_builds_folder_totals() {
        let mut store = plain_store();
        store.initialize(vec![
            ("a/b/one.md", "12345"),
            ("a/two.md", "123"),
            ("c/three.md", "1"),
            ("root.md", "1234"),
        ]);

        assert_eq!(store.file_count("a/b/one.md"), Some(5));
        assert_eq!(store.folder_count("a"), Some(8));
        assert_eq!(store.folder_count("a/b"), Some(5));
        assert_eq!(store.folder_count("c"), Some(1));
        assert_eq!(store.folder_count("root.md"), None);
        assert_eq!(store.tracked_file_count(), 4);
        assert_folders_match_files(&store);
    }

    #[test]
    fn test_initialize_resets_previous_state() {
        let mut store = plain_store();
        store.initialize(vec![("a/old.md", "xxxx")]);
        store.initialize(vec![("b/new.md", "yy")]);

        assert_eq!(store.file_count("a/old.md"), None);
        assert_eq!(store.folder_count("a"), None);
        assert_eq!(store.folder_count("b"), Some(2));
    }

    #[test]
    fn test_recalculate_propagates_delta_to_ancestors_only() {
        let mut store = plain_store();
        store.initialize(vec![("a/b.md", "0123456789"), ("s/c.md", "abc")]);

        let delta = store.recalculate("a/b.md", "012345678901234");

        assert_eq!(delta, 5);
        assert_eq!(store.folder_count("a"), Some(15));
        assert_eq!(store.folder_count("s"), Some(3));
    }

    #[test]
    fn test_recalculate_untracked_path_counts_from_zero() {
        let mut store = plain_store();
        assert_eq!(store.recalculate("x/y/z.md", "abcd"), 4);
        assert_eq!(store.folder_count("x"), Some(4));
        assert_eq!(store.folder_count("x/y"), Some(4));
    }

    #[test]
    fn test_unchanged_text_yields_zero_delta() {
        let mut store = plain_store();
        store.recalculate("a/b.md", "same");
        assert_eq!(store.recalculate("a/b.md", "same"), 0);
    }

    #[test]
    fn test_remove_last_file_drives_folder_to_zero() {
        let mut store = plain_store();
        store.initialize(vec![("a/only.md", "abcdef")]);

        assert_eq!(store.remove("a/only.md"), -6);
        assert_eq!(store.file_count("a/only.md"), None);
        assert_eq!(store.folder_count("a"), Some(0));
    }

    #[test]
    fn test_remove_untracked_or_zero_count_is_a_noop() {
        let mut store = plain_store();
        store.initialize(vec![("a/empty.md", "   ")]);

        assert_eq!(store.remove("a/missing.md"), 0);
        assert_eq!(store.remove("a/empty.md"), 0);
        // Zero-count entries stay tracked.
        assert_eq!(store.file_count("a/empty.md"), Some(0));
        assert_eq!(store.folder_count("a"), Some(0));
    }

    #[test]
    fn test_rename_moves_count_between_folders() {
        let mut store = plain_store();
        store.initialize(vec![("a/note.md", "abcd"), ("a/keep.md", "z")]);

        let delta = store.rename("a/note.md", "b/c/note.md", "abcdef");

        assert_eq!(delta, 6);
        assert_eq!(store.file_count("a/note.md"), None);
        assert_eq!(store.folder_count("a"), Some(1));
        assert_eq!(store.folder_count("b"), Some(6));
        assert_eq!(store.folder_count("b/c"), Some(6));
        assert_folders_match_files(&store);
    }

    #[test]
    fn test_rename_of_empty_document_drops_old_path() {
        let mut store = plain_store();
        store.initialize(vec![("a/empty.md", "")]);

        let delta = store.rename("a/empty.md", "b/empty.md", "");

        assert_eq!(delta, 0);
        assert_eq!(store.file_count("a/empty.md"), None);
        assert_eq!(store.file_count("b/empty.md"), Some(0));
        assert_eq!(store.tracked_file_count(), 1);
        assert_eq!(store.folder_count("a"), Some(0));
        assert_folders_match_files(&store);
    }

    #[test]
    fn test_display_count_prefers_file_then_folder() {
        let mut store = CountStore::new(Arc::new(MarkdownCharacterCounter::new()));
        store.initialize(vec![("notes/hello.md", "# Hello")]);

        assert_eq!(store.display_count("notes/hello.md"), 5);
        assert_eq!(store.display_count("notes"), 5);
        assert_eq!(store.display_count("unknown"), 0);
    }

    #[test]
    fn test_propagate_to_ancestors_inserts_missing_folders() {
        let mut store = plain_store();
        store.propagate_to_ancestors("p/q/r.md", -3);
        assert_eq!(store.folder_count("p"), Some(-3));
        assert_eq!(store.folder_count("p/q"), Some(-3));
        assert_eq!(store.folder_count("p/q/r.md"), None);
    }

    #[test]
    fn test_random_operation_sequences_keep_folders_in_sync() {
        const PATHS: &[&str] = &[
            "a.md", "a/b.md", "a/c.md", "a/b/d.md", "a/b/e.md", "x/y/z/w.md", "x/v.md",
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let mut store = plain_store();
        store.initialize(PATHS.iter().take(3).map(|p| (*p, "seed")));

        for _ in 0..500 {
            let path = PATHS[rng.random_range(0..PATHS.len())];
            let text = "x".repeat(rng.random_range(0..12));
            match rng.random_range(0..3) {
                0 => {
                    store.recalculate(path, &text);
                }
                1 => {
                    store.remove(path);
                }
                _ => {
                    let target = PATHS[rng.random_range(0..PATHS.len())];
                    store.rename(path, target, &text);
                }
            }
            assert_folders_match_files(&store);
            for count in store.folder_counts().values() {
                assert!(*count >= 0);
            }
        }
    }
}
