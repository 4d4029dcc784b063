// サブフォルダ内画像の連番リネーム
//
// 各サブフォルダの有効な画像をファイル名の辞書順に並べ、01.ext, 02.ext ... に改名する。
// 改名は一時名を経由する2段階で行い、既存ファイルを上書きしない。

use anyhow::anyhow;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{BatchError, BatchResult};
use crate::file_scanner::FileScanner;
use crate::image_validator::ImageValidator;

const STAGING_PREFIX: &str = ".rename-staging-";

/// リネーム処理の結果（互いに排他）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    NoSubfolders,
    NothingRenamed { subfolders: usize },
    Renamed { subfolders: usize, files: usize },
}

/// リネーム処理のレポート
#[derive(Debug)]
pub struct RenameReport {
    pub outcome: RenameOutcome,
    /// ファイル単位・サブフォルダ単位の失敗（処理は継続済み）
    pub failures: Vec<BatchError>,
}

impl RenameReport {
    pub fn message(&self) -> String {
        match self.outcome {
            RenameOutcome::NoSubfolders => {
                "No subfolders found in the selected directory.".to_string()
            }
            RenameOutcome::NothingRenamed { .. } => {
                "No images were renamed (already named correctly, or no images found).".to_string()
            }
            RenameOutcome::Renamed { subfolders, files } => {
                format!("Renamed {files} images in {subfolders} subfolders.")
            }
        }
    }
}

/// 一時名に退避済みのリネーム
struct StagedRename {
    original: PathBuf,
    staging: PathBuf,
    target: PathBuf,
}

/// 親ディレクトリ直下の各サブフォルダで画像を連番にリネームする
pub fn rename_images(parent_directory: &Path) -> BatchResult<RenameReport> {
    if !parent_directory.is_dir() {
        return Err(BatchError::not_a_directory(parent_directory));
    }

    let subfolders = FileScanner::list_subfolders(parent_directory)
        .map_err(|e| BatchError::listing(parent_directory, e))?;

    let mut failures = Vec::new();
    let mut renamed_total = 0;

    for subfolder in &subfolders {
        renamed_total += rename_subfolder(subfolder, &mut failures);
    }

    let outcome = if subfolders.is_empty() {
        RenameOutcome::NoSubfolders
    } else if renamed_total == 0 {
        RenameOutcome::NothingRenamed {
            subfolders: subfolders.len(),
        }
    } else {
        RenameOutcome::Renamed {
            subfolders: subfolders.len(),
            files: renamed_total,
        }
    };

    tracing::info!(
        "rename finished in {}: {:?}, {} failures",
        parent_directory.display(),
        outcome,
        failures.len()
    );

    Ok(RenameReport { outcome, failures })
}

/// 1つのサブフォルダをリネームし、改名したファイル数を返す
fn rename_subfolder(folder: &Path, failures: &mut Vec<BatchError>) -> usize {
    let files = match FileScanner::list_files(folder) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!("skipping {}: {e}", folder.display());
            failures.push(BatchError::listing(folder, e));
            return 0;
        }
    };

    // list_filesは辞書順で返す。中断時に残った一時名のファイルは対象外
    let mut plan: Vec<(PathBuf, PathBuf)> = files
        .into_iter()
        .filter(|path| !is_staging_name(path))
        .filter(|path| ImageValidator::is_valid_image(path))
        .enumerate()
        .map(|(i, source)| {
            let target = folder.join(sequential_name(i + 1, &source));
            (source, target)
        })
        .filter(|(source, target)| source != target)
        .collect();

    drop_blocked_renames(&mut plan, failures);

    let mut staged = Vec::with_capacity(plan.len());
    for (n, (source, target)) in plan.into_iter().enumerate() {
        let staging = staging_path(folder, n);
        match fs::rename(&source, &staging) {
            Ok(()) => staged.push(StagedRename {
                original: source,
                staging,
                target,
            }),
            Err(e) => {
                tracing::warn!("could not rename {}: {e}", source.display());
                failures.push(BatchError::file(&source, e.into()));
            }
        }
    }

    let mut renamed = 0;
    for rename in staged {
        if rename.target.exists() {
            let error = anyhow!(
                "target {} is occupied by a file that is not part of the sequence",
                rename.target.display()
            );
            restore(&rename, failures);
            tracing::warn!("could not rename {}: {error}", rename.original.display());
            failures.push(BatchError::file(&rename.original, error));
            continue;
        }

        match fs::rename(&rename.staging, &rename.target) {
            Ok(()) => renamed += 1,
            Err(e) => {
                restore(&rename, failures);
                tracing::warn!("could not rename {}: {e}", rename.original.display());
                failures.push(BatchError::file(&rename.original, e.into()));
            }
        }
    }

    renamed
}

/// 対象外のファイルが占有している改名先があれば、その項目以降を計画から外す
///
/// 外した項目の元の名前が前の項目の改名先になっている場合もあるため、
/// 占有がなくなるまで繰り返す。
fn drop_blocked_renames(plan: &mut Vec<(PathBuf, PathBuf)>, failures: &mut Vec<BatchError>) {
    loop {
        let sources: HashSet<&PathBuf> = plan.iter().map(|(source, _)| source).collect();
        let blocked = plan
            .iter()
            .position(|(_, target)| target.exists() && !sources.contains(target));

        let Some(index) = blocked else {
            return;
        };

        let occupied = plan[index].1.clone();
        for (source, _) in plan.drain(index..) {
            let error = anyhow!(
                "target {} is occupied by a file that is not part of the sequence",
                occupied.display()
            );
            tracing::warn!("could not rename {}: {error}", source.display());
            failures.push(BatchError::file(&source, error));
        }
    }
}

/// 一時名から元の名前へ戻す。元の名前が既に使われていれば一時名のまま残す
fn restore(rename: &StagedRename, failures: &mut Vec<BatchError>) {
    if rename.original.exists() {
        let error = anyhow!(
            "{} is already taken, file left at {}",
            rename.original.display(),
            rename.staging.display()
        );
        tracing::error!("could not restore: {error}");
        failures.push(BatchError::file(&rename.staging, error));
        return;
    }

    if let Err(e) = fs::rename(&rename.staging, &rename.original) {
        tracing::error!(
            "could not restore {} from {}: {e}",
            rename.original.display(),
            rename.staging.display()
        );
        failures.push(BatchError::file(&rename.staging, e.into()));
    }
}

/// `{index:02}{.ext}` 形式の新しいファイル名（拡張子の大文字小文字は保持）
pub fn sequential_name(index: usize, source: &Path) -> OsString {
    let mut name = OsString::from(format!("{index:02}"));
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

fn is_staging_name(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with(STAGING_PREFIX))
}

fn staging_path(folder: &Path, n: usize) -> PathBuf {
    let mut attempt = 0;
    loop {
        let candidate = folder.join(format!("{STAGING_PREFIX}{n:04}-{attempt}"));
        if !candidate.exists() {
            return candidate;
        }
        attempt += 1;
    }
}
