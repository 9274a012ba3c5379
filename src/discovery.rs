use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Recursively collect every file under `root` whose name contains
/// `extension`, ignoring case.
///
/// Entries are visited depth-first with siblings sorted by file name, which
/// is the order slices are stacked in unless a [`SortBy`] key is requested.
///
/// [`SortBy`]: crate::enums::SortBy
pub fn find_slice_files(
    root: impl AsRef<Path>,
    extension: &str,
    follow_links: bool,
) -> Result<Vec<PathBuf>> {
    let needle = extension.to_lowercase();
    let mut paths = Vec::new();

    for entry in WalkDir::new(root.as_ref())
        .follow_links(follow_links)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_string_lossy()
            .to_lowercase()
            .contains(&needle)
        {
            paths.push(entry.into_path());
        }
    }

    tracing::debug!(
        "Found {} files matching {:?} under {}",
        paths.len(),
        extension,
        root.as_ref().display()
    );
    Ok(paths)
}
