// サブフォルダ単位のCBZアーカイブ作成
//
// 有効な画像をファイル名順に並べ、必要に応じて超解像をかけてから
// `{親ディレクトリ}/{フォルダ名}.cbz` に書き込む。

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::core::{
    BatchError, BatchResult, ComputeTarget, ProgressEvent, ARCHIVE_EXTENSION, COMPRESSION_LEVEL,
};
use crate::engine::ProgressEmitter;
use crate::file_scanner::FileScanner;
use crate::image_validator::ImageValidator;
use crate::super_resolution::{upscale, UpscaleModel};

/// 1つのサブフォルダに対するアーカイブ作成結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// 有効な画像がなく、アーカイブを作成しなかった
    Skipped,
    Written {
        archive: PathBuf,
        entries: usize,
        failed: usize,
    },
}

/// サブフォルダに対応するアーカイブのパス
pub fn archive_path(subfolder: &Path) -> BatchResult<PathBuf> {
    let name = subfolder
        .file_name()
        .ok_or_else(|| BatchError::archive(subfolder, anyhow!("folder has no name")))?;
    let parent = subfolder.parent().unwrap_or_else(|| Path::new("."));

    let mut file_name = name.to_os_string();
    file_name.push(".");
    file_name.push(ARCHIVE_EXTENSION);
    Ok(parent.join(file_name))
}

/// アーカイブに含める画像（拡張子と中身の両方で検証済み、名前順）
pub fn collect_valid_images(subfolder: &Path) -> BatchResult<Vec<PathBuf>> {
    let candidates = FileScanner::list_image_candidates(subfolder)
        .map_err(|e| BatchError::listing(subfolder, e))?;

    Ok(candidates
        .into_iter()
        .filter(|path| {
            let valid = ImageValidator::is_valid_image(path);
            if !valid {
                tracing::warn!("skipping invalid or corrupted file: {}", path.display());
            }
            valid
        })
        .collect())
}

/// サブフォルダの画像を1つのアーカイブにまとめる
///
/// `sr_enabled` かつモデルがある場合のみ超解像を適用する。ファイル単位の失敗は
/// 警告としてログに残し、そのエントリを除いて処理を続ける。
pub fn build_archive<M, E>(
    subfolder: &Path,
    model: Option<&M>,
    target: ComputeTarget,
    sr_enabled: bool,
    emitter: &E,
) -> BatchResult<ArchiveOutcome>
where
    M: UpscaleModel + ?Sized,
    E: ProgressEmitter + ?Sized,
{
    let images = collect_valid_images(subfolder)?;
    if images.is_empty() {
        tracing::warn!(
            "folder {} is empty or has no valid images, skipping",
            subfolder.display()
        );
        return Ok(ArchiveOutcome::Skipped);
    }

    let archive = archive_path(subfolder)?;
    let file = File::create(&archive).map_err(|e| BatchError::archive(&archive, e.into()))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let model = if sr_enabled { model } else { None };
    let total = images.len();
    let mut entries = 0;
    let mut failed = 0;

    for (i, image_path) in images.iter().enumerate() {
        match add_entry(&mut writer, image_path, model, target, options) {
            Ok(()) => entries += 1,
            Err(error) => {
                failed += 1;
                tracing::warn!("failed to add {}: {error:#}", image_path.display());
            }
        }
        emitter.emit(ProgressEvent::FileProgress {
            index: i + 1,
            total,
        });
    }

    if let Err(error) = finish(writer) {
        if let Err(e) = fs::remove_file(&archive) {
            tracing::warn!("could not remove partial archive {}: {e}", archive.display());
        }
        return Err(BatchError::archive(&archive, error));
    }

    tracing::info!(
        "wrote {} ({entries} entries, {failed} failed)",
        archive.display()
    );

    Ok(ArchiveOutcome::Written {
        archive,
        entries,
        failed,
    })
}

fn add_entry<W, M>(
    writer: &mut ZipWriter<W>,
    image_path: &Path,
    model: Option<&M>,
    target: ComputeTarget,
    options: SimpleFileOptions,
) -> Result<()>
where
    W: Write + Seek,
    M: UpscaleModel + ?Sized,
{
    let entry_name = image_path
        .file_name()
        .context("image has no file name")?
        .to_string_lossy()
        .into_owned();

    let processed = upscale(image_path, model, target);
    let data = fs::read(processed.path())
        .with_context(|| format!("Failed to read {}", processed.path().display()));
    processed.cleanup();
    let data = data?;

    writer
        .start_file(entry_name, options)
        .context("Failed to start archive entry")?;
    writer
        .write_all(&data)
        .context("Failed to write archive entry")?;
    Ok(())
}

fn finish<W: Write + Seek>(writer: ZipWriter<W>) -> Result<()> {
    let mut inner = writer.finish().context("Failed to finalize archive")?;
    inner.flush().context("Failed to flush archive")?;
    Ok(())
}
