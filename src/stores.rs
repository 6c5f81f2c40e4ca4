//! Store discovery from the repository's store archive

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Directory under the repository root whose subdirectories name the stores
pub const STORE_ARCHIVE_DIR: &str = "店铺档案";

/// Store used when the archive is absent or holds no store directories
pub const DEFAULT_STORE: &str = "杭州-首店";

/// Collect store names from `<repo_root>/店铺档案`
///
/// Each immediate subdirectory is one store; plain files are ignored. Order
/// follows the filesystem enumeration. Never fails: a missing, unreadable or
/// empty archive yields the single [`DEFAULT_STORE`].
pub fn discover_stores(repo_root: &Path) -> Vec<String> {
    let archive = repo_root.join(STORE_ARCHIVE_DIR);
    let mut stores = Vec::new();

    match fs::read_dir(&archive) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir {
                    continue;
                }
                match entry.file_name().into_string() {
                    Ok(name) => stores.push(name),
                    Err(name) => {
                        warn!(name = ?name, "skipping store directory with a non-UTF-8 name");
                    }
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %archive.display(), "store archive not found");
        }
        Err(e) => {
            warn!(path = %archive.display(), error = %e, "cannot read store archive");
        }
    }

    if stores.is_empty() {
        debug!(default = DEFAULT_STORE, "no stores discovered, using default");
        return vec![DEFAULT_STORE.to_string()];
    }

    debug!(count = stores.len(), "discovered stores");
    stores
}
