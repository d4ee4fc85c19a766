use ignore::WalkBuilder;
use log::debug;
use std::path::{Path, PathBuf};

pub const METADATA_DIR: &str = ".git";

/// Deepest level below the source root that is searched.
pub const MAX_DEPTH: usize = 2;

/// Find the `.git` directory of the repository extracted under `root`.
///
/// Only the root and its children down to [`MAX_DEPTH`] are searched; nested
/// layouts below that are treated as having no repository.
pub fn find_git_dir(root: &Path) -> Option<PathBuf> {
    let direct = root.join(METADATA_DIR);
    if direct.is_dir() {
        return Some(direct);
    }

    let walker = WalkBuilder::new(root)
        .max_depth(Some(MAX_DEPTH))
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir && entry.file_name() == METADATA_DIR {
            return Some(entry.into_path());
        }
    }

    None
}
