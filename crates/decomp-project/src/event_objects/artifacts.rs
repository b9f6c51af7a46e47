//! Moving event object pictures to their canonical location.

use std::fs;
use std::path::{Path, PathBuf};

use decomp_model::PicTable;

use crate::error::{ProjectError, Result};
use crate::io;
use crate::layout::ProjectLayout;

const DERIVED_EXTENSIONS: [&str; 2] = ["4bpp", "gbapal"];

/// Copy every picture whose image is not at its canonical path there,
/// delete the derived artifacts at both locations, and point the picture at
/// its new file. Returns the number of pictures moved.
pub fn relocate_pics(root: &Path, layout: &ProjectLayout, pics: &mut PicTable) -> Result<usize> {
    let mut moved = 0;
    for pic in pics.iter_mut() {
        let canonical = layout.event_object_pic(root, pic.path());
        let source = pic.full_path().to_path_buf();
        if same_file_path(&source, &canonical) {
            continue;
        }

        if let Some(parent) = canonical.parent() {
            fs::create_dir_all(parent).map_err(ProjectError::io("create directory", parent))?;
        }
        fs::copy(&source, &canonical).map_err(ProjectError::io("copy", &source))?;
        tracing::debug!(
            from = %source.display(),
            to = %canonical.display(),
            "relocated event object picture"
        );

        remove_derived(&canonical)?;
        if source.starts_with(root) {
            remove_derived(&source)?;
        }
        pic.set_full_path(canonical);
        moved += 1;
    }
    Ok(moved)
}

fn remove_derived(image: &Path) -> Result<()> {
    for extension in DERIVED_EXTENSIONS {
        let artifact = image.with_extension(extension);
        if io::remove_if_exists(&artifact)? {
            tracing::debug!(path = %artifact.display(), "removed stale artifact");
        }
    }
    Ok(())
}

fn same_file_path(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

/// Lexically drop `.` components so `root/./x.png` equals `root/x.png`.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, std::path::Component::CurDir))
        .collect()
}
