//! Applying pending token renames across the project's text sources.

use std::fs;
use std::path::{Path, PathBuf};

use decomp_model::RenameLedger;
use walkdir::WalkDir;

use crate::error::{ProjectError, Result};
use crate::io;
use crate::layout::ProjectLayout;

/// Text sources eligible for substitution: files with a configured
/// extension under the source directories, plus makefiles at the root.
pub fn source_files(root: &Path, layout: &ProjectLayout) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir in &layout.source_dirs {
        let dir = root.join(dir);
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&dir).sort_by_file_name() {
            let entry = entry.map_err(|error| {
                let path = error.path().unwrap_or(dir.as_path()).to_path_buf();
                ProjectError::Io {
                    operation: "list",
                    path,
                    source: error.into(),
                }
            })?;
            if entry.file_type().is_file() && has_source_extension(entry.path(), layout) {
                files.push(entry.into_path());
            }
        }
    }

    let mut makefiles = Vec::new();
    for entry in fs::read_dir(root).map_err(ProjectError::io("list", root))? {
        let path = entry.map_err(ProjectError::io("list", root))?.path();
        if path.is_file() && path.extension().is_some_and(|extension| extension == "mk") {
            makefiles.push(path);
        }
    }
    makefiles.sort();
    files.extend(makefiles);
    Ok(files)
}

fn has_source_extension(path: &Path, layout: &ProjectLayout) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| layout.source_extensions.iter().any(|known| known == extension))
}

/// Apply every pending rename in `ledger` to the project's text sources.
///
/// Only files whose content changes are rewritten. Files that are not valid
/// UTF-8 are skipped. Returns the number of files rewritten.
pub fn apply_renames(root: &Path, layout: &ProjectLayout, ledger: &RenameLedger) -> Result<usize> {
    if ledger.is_empty() {
        return Ok(0);
    }
    for replacement in ledger.entries() {
        tracing::debug!(from = %replacement.from, to = %replacement.to, "pending token rename");
    }

    let mut rewritten = 0;
    for path in source_files(root, layout)? {
        let bytes = fs::read(&path).map_err(ProjectError::io("read", &path))?;
        let Ok(text) = std::str::from_utf8(&bytes) else {
            tracing::debug!(path = %path.display(), "skipping non-UTF-8 source");
            continue;
        };
        if let Some(updated) = ledger.substitute(text) {
            io::write_atomic(&path, updated.as_bytes())?;
            tracing::debug!(path = %path.display(), "applied token renames");
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn only_matching_sources_are_listed() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path();
        fs::create_dir_all(root.join("src/data")).expect("mkdir");
        fs::create_dir_all(root.join("graphics")).expect("mkdir");
        fs::write(root.join("src/data/a.h"), "").expect("write");
        fs::write(root.join("src/data/b.png"), "").expect("write");
        fs::write(root.join("graphics/c.h"), "").expect("write");
        fs::write(root.join("rules.mk"), "").expect("write");
        fs::write(root.join("README.md"), "").expect("write");

        let files = source_files(root, &ProjectLayout::default()).expect("list");
        assert_eq!(files, vec![root.join("src/data/a.h"), root.join("rules.mk")]);
    }
}
