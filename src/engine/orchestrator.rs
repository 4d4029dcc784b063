// バッチオーケストレーター - ソースディレクトリ全体の処理を制御
//
// 状態遷移: Init → ResolveDevice → ForEachSubfolder{Scan → Archive → PostAction} → Finalize
// どの経路でも終端イベント（Done）は必ず1回だけ送出される。

use std::fs;
use std::path::{Path, PathBuf};

use super::ProgressEmitter;
use crate::archive_builder::{build_archive, ArchiveOutcome};
use crate::core::{
    BatchConfig, BatchError, BatchResult, BatchSummary, ComputeTarget, ProgressEvent,
};
use crate::file_scanner::FileScanner;
use crate::super_resolution::UpscaleModel;

/// バッチ実行のオーケストレーター
///
/// モデルは実行ごとに所有し、開始時に一度だけ演算装置へ配置する。
pub struct BatchOrchestrator<M> {
    config: BatchConfig,
    model: Option<M>,
}

impl<M> BatchOrchestrator<M>
where
    M: UpscaleModel,
{
    pub fn new(config: BatchConfig, model: Option<M>) -> Self {
        Self { config, model }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// バッチ処理を実行し、最後に終端イベントを送出する
    ///
    /// 致命的なエラーはエラーイベントと `Done(None)` を送出したうえで返す。
    pub fn run<E>(mut self, emitter: &E) -> BatchResult<BatchSummary>
    where
        E: ProgressEmitter + ?Sized,
    {
        let result = self.execute(emitter);

        match &result {
            Ok(summary) => {
                tracing::info!("{summary}");
                emitter.emit(ProgressEvent::Done(Some(summary.clone())));
            }
            Err(error) => {
                tracing::error!("batch run aborted: {error}");
                emitter.emit(ProgressEvent::Error(error.to_string()));
                emitter.emit(ProgressEvent::Done(None));
            }
        }

        result
    }

    fn execute<E>(&mut self, emitter: &E) -> BatchResult<BatchSummary>
    where
        E: ProgressEmitter + ?Sized,
    {
        let source = self.config.source_dir().to_path_buf();
        if !source.is_dir() {
            return Err(BatchError::source_missing(&source));
        }

        let target = self.resolve_device(emitter)?;
        let subfolders = self.scan_subfolders(&source)?;

        let total = subfolders.len();
        let mut summary = BatchSummary {
            total_folders: total,
            ..Default::default()
        };

        if subfolders.is_empty() {
            tracing::warn!("no subfolders found in {}", source.display());
            emitter.emit(ProgressEvent::Warning(
                "No subfolders to compress.".to_string(),
            ));
            return Ok(summary);
        }

        let model = target.and(self.model.as_ref());
        let target = target.unwrap_or(ComputeTarget::Standard);

        for (i, subfolder) in subfolders.iter().enumerate() {
            let name = folder_name(subfolder);
            emitter.emit(ProgressEvent::FolderProgress {
                index: i + 1,
                total,
                name: name.clone(),
            });

            match build_archive(subfolder, model, target, model.is_some(), emitter) {
                Ok(ArchiveOutcome::Skipped) => {
                    summary.folders_skipped += 1;
                    emitter.emit(ProgressEvent::Warning(format!(
                        "Folder '{name}' is empty or has no valid images; skipped."
                    )));
                }
                Ok(ArchiveOutcome::Written {
                    entries, failed, ..
                }) => {
                    summary.folders_archived += 1;
                    summary.files_archived += entries;
                    summary.file_failures += failed;
                    self.finish_folder(subfolder, &name, failed, emitter, &mut summary);
                }
                Err(error) => {
                    summary.folders_failed += 1;
                    tracing::error!("folder {} failed: {error}", subfolder.display());
                    emitter.emit(ProgressEvent::Error(format!(
                        "Error processing folder '{name}': {error}"
                    )));
                }
            }
        }

        Ok(summary)
    }

    /// 超解像が有効な場合のみ演算装置を決定し、モデルを一度だけ準備する
    fn resolve_device<E>(&mut self, emitter: &E) -> BatchResult<Option<ComputeTarget>>
    where
        E: ProgressEmitter + ?Sized,
    {
        if !self.config.super_resolution() {
            return Ok(None);
        }

        let model = self.model.as_mut().ok_or(BatchError::ModelUnavailable)?;
        let target = ComputeTarget::resolve(model.accelerator_available());
        let name = model.name();

        let description = target.describe(&name);
        tracing::info!("{description}");
        emitter.emit(ProgressEvent::Info(description));

        model
            .prepare(target)
            .map_err(|e| BatchError::model_preparation(name, target.to_string(), e))?;

        Ok(Some(target))
    }

    /// 処理対象のサブフォルダ（名前順、移動先ディレクトリは除外）
    fn scan_subfolders(&self, source: &Path) -> BatchResult<Vec<PathBuf>> {
        let done_dir = self.config.done_dir();
        let subfolders = FileScanner::list_subfolders(source)
            .map_err(|e| BatchError::listing(source, e))?;

        Ok(subfolders
            .into_iter()
            .filter(|path| path != &done_dir)
            .collect())
    }

    /// 読み込めなかったファイルがあるフォルダは削除・移動せずに残す
    fn finish_folder<E>(
        &self,
        subfolder: &Path,
        name: &str,
        failed: usize,
        emitter: &E,
        summary: &mut BatchSummary,
    ) where
        E: ProgressEmitter + ?Sized,
    {
        let has_post_action = self.config.delete_after() || self.config.move_to_done();
        if failed > 0 && has_post_action {
            tracing::warn!(
                "{} has {failed} files missing from its archive, leaving it in place",
                subfolder.display()
            );
            emitter.emit(ProgressEvent::Warning(format!(
                "Folder '{name}' had {failed} unreadable files; left in place."
            )));
            return;
        }

        self.post_action(subfolder, name, emitter, summary);
    }

    /// アーカイブ作成後の削除・移動。失敗してもアーカイブ結果には影響しない
    fn post_action<E>(
        &self,
        subfolder: &Path,
        name: &str,
        emitter: &E,
        summary: &mut BatchSummary,
    ) where
        E: ProgressEmitter + ?Sized,
    {
        if self.config.delete_after() {
            match fs::remove_dir_all(subfolder) {
                Ok(()) => tracing::info!("deleted {}", subfolder.display()),
                Err(e) => {
                    summary.post_action_failures += 1;
                    let error = BatchError::post_action(subfolder, e);
                    tracing::error!("{error}");
                    emitter.emit(ProgressEvent::Error(format!(
                        "Could not delete folder '{name}': {error}"
                    )));
                }
            }
        } else if self.config.move_to_done() {
            let done_dir = self.config.done_dir();
            let Some(file_name) = subfolder.file_name() else {
                return;
            };
            let destination = done_dir.join(file_name);

            if destination.exists() {
                tracing::warn!("{} already exists, not moving", destination.display());
                emitter.emit(ProgressEvent::Warning(format!(
                    "Folder '{name}' already exists in '{}'; not moved.",
                    self.config.done_dir_name()
                )));
                return;
            }

            let moved = fs::create_dir_all(&done_dir)
                .and_then(|()| fs::rename(subfolder, &destination));
            match moved {
                Ok(()) => tracing::info!(
                    "moved {} to {}",
                    subfolder.display(),
                    destination.display()
                ),
                Err(e) => {
                    summary.post_action_failures += 1;
                    let error = BatchError::post_action(subfolder, e);
                    tracing::error!("{error}");
                    emitter.emit(ProgressEvent::Error(format!(
                        "Could not move folder '{name}' to '{}': {error}",
                        self.config.done_dir_name()
                    )));
                }
            }
        }
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
