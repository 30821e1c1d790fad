// Cross-platform file utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File utilities for cross-platform operations
pub struct FileUtils;

impl FileUtils {
    /// Path with its final extension removed: `results/out.trx` -> `results/out`
    pub fn without_extension(path: &Path) -> PathBuf {
        match path.file_stem() {
            Some(stem) if path.extension().is_some() => path.with_file_name(stem),
            _ => path.to_path_buf(),
        }
    }

    /// Final path component as a string
    pub fn base_name(path: &Path) -> Option<String> {
        path.file_name().map(|n| n.to_string_lossy().into_owned())
    }

    /// `path` relative to `base` when it lies underneath, otherwise unchanged
    pub fn relative_to(path: &Path, base: &Path) -> String {
        path.strip_prefix(base)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    /// Copy `source` into `dir`, keeping only its base name. Returns the base name.
    pub fn copy_into_dir(source: &Path, dir: &Path) -> Result<String> {
        let name = Self::base_name(source)
            .with_context(|| format!("Attachment has no file name: {}", source.display()))?;
        let target = dir.join(&name);
        fs::copy(source, &target).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                source.display(),
                target.display()
            )
        })?;
        Ok(name)
    }
}
