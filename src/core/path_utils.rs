/*
 * This module provides utility functions for path manipulation. It covers two
 * concerns: resolving the application's local configuration directory on disk,
 * and splitting vault-relative document paths (opaque `/`-separated strings)
 * into the ancestor folders whose aggregated counts depend on them.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub const VAULT_PATH_SEPARATOR: char = '/';

/*
 * Retrieves the application's primary local configuration directory.
 * This function determines the platform-specific path for local (non-roaming)
 * application configuration data. It ensures the directory exists, creating it
 * if necessary.
 *
 * Args:
 *   app_name: The name of the application, used to derive the directory path.
 *
 * Returns:
 *   An `Option<PathBuf>` containing the path to the directory if successful,
 *   or `None` if the directory could not be determined or created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Attempting to get base app config local dir for '{app_name}'");
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {config_path:?}: {e}"
                );
                return None;
            }
            log::debug!("PathUtils: Created base app config directory: {config_path:?}");
        }
        Some(config_path.to_path_buf())
    })
}

/*
 * Returns every proper ancestor folder of a vault path, outermost first.
 * For `a/b/c.md` this yields `a` and `a/b`. The path itself and the empty
 * prefix are never included. No normalization is performed, so `./a/b.md`
 * yields `.` and `./a`.
 */
pub fn ancestor_folders(path: &str) -> Vec<&str> {
    path.match_indices(VAULT_PATH_SEPARATOR)
        .map(|(idx, _)| &path[..idx])
        .filter(|prefix| !prefix.is_empty())
        .collect()
}

/*
 * True when `candidate` is `path` itself or one of its ancestor folders,
 * comparing whole path segments only (`a` is an ancestor of `a/b.md`, `ab`
 * is not).
 */
pub fn is_self_or_ancestor(candidate: &str, path: &str) -> bool {
    if candidate == path {
        return true;
    }
    path.strip_prefix(candidate)
        .is_some_and(|rest| !candidate.is_empty() && rest.starts_with(VAULT_PATH_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestor_folders_nested_path() {
        assert_eq!(ancestor_folders("a/b/c.md"), vec!["a", "a/b"]);
    }

    #[test]
    fn test_ancestor_folders_root_level_file_has_none() {
        assert!(ancestor_folders("note.md").is_empty());
        assert!(ancestor_folders("").is_empty());
    }

    #[test]
    fn test_ancestor_folders_is_not_normalized() {
        // Leading separators produce an empty prefix, which is skipped.
        assert_eq!(ancestor_folders("/a/b.md"), vec!["/a"]);
        assert_eq!(ancestor_folders("./a/b.md"), vec![".", "./a"]);
        // Trailing separators are taken literally.
        assert_eq!(ancestor_folders("a/b/"), vec!["a", "a/b"]);
    }

    #[test]
    fn test_is_self_or_ancestor_matches_whole_segments() {
        assert!(is_self_or_ancestor("a/b.md", "a/b.md"));
        assert!(is_self_or_ancestor("a", "a/b.md"));
        assert!(is_self_or_ancestor("a/b", "a/b/c.md"));
        assert!(!is_self_or_ancestor("ab", "abc/d.md"));
        assert!(!is_self_or_ancestor("a/b.md", "a"));
        assert!(!is_self_or_ancestor("", "a/b.md"));
    }

    #[test]
    fn test_get_base_app_config_local_dir_creates_directory() {
        let unique_app_name = format!("TestApp_VaultTally_PathUtils_{}", rand::random::<u128>());

        let path = get_base_app_config_local_dir(&unique_app_name);

        // Some sandboxed environments have no home directory at all.
        if let Some(path) = path {
            assert!(path.is_dir());
            assert!(
                path.to_string_lossy()
                    .to_lowercase()
                    .contains(&unique_app_name.to_lowercase())
            );
            if let Err(e) = fs::remove_dir_all(&path) {
                eprintln!("Test cleanup failed for {}: {e}", path.display());
            }
        }
    }
}
