//! Clean the output directory

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Remove the output directory and everything in it
pub fn run(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)
            .with_context(|| format!("Failed to delete {:?}", output_dir))?;
        tracing::info!("Deleted: {:?}", output_dir);
    }

    Ok(())
}

/// Fail when removing `output_dir` would also remove `source_dir`, i.e. the
/// two are the same directory or the output contains the source. Paths are
/// resolved first so `posts` and `.` compare correctly.
pub fn check_output_dir(source_dir: &Path, output_dir: &Path) -> Result<()> {
    // Nothing to delete
    if !output_dir.exists() {
        return Ok(());
    }

    let output = fs::canonicalize(output_dir)
        .with_context(|| format!("Failed to resolve {:?}", output_dir))?;
    let source = fs::canonicalize(source_dir).unwrap_or_else(|_| source_dir.to_path_buf());

    if source.starts_with(&output) {
        anyhow::bail!(
            "Refusing to clean {:?}: it contains the source directory {:?}",
            output_dir,
            source_dir
        );
    }

    Ok(())
}
