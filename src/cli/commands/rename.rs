use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::renamer::{rename_images, RenameOutcome};

/// サブフォルダ内の画像を連番にリネームする
pub async fn execute_rename(parent_directory: PathBuf) -> Result<RenameOutcome> {
    println!("📂 対象ディレクトリ: {}", parent_directory.display());

    let directory = parent_directory.clone();
    let report = tokio::task::spawn_blocking(move || rename_images(&directory))
        .await
        .context("Rename worker panicked")?
        .with_context(|| format!("Failed to rename images in {}", parent_directory.display()))?;

    for failure in &report.failures {
        eprintln!("⚠️  {failure}");
    }
    println!("✅ {}", report.message());

    Ok(report.outcome)
}
