// エラーハンドリングの統合テスト
#[path = "../fixtures/mod.rs"]
mod fixtures;

use fixtures::*;
use manga_utils::{
    core::ErrorScope,
    progress::{NoOpProgressView, ProgressSink},
    rename_images, BatchConfig, BatchError, BatchRunner, ComputeTarget, ProgressEvent,
    ResampleUpscaler, UpscaleModel,
};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_source_ends_with_failed_terminal_event() {
    let temp_dir = TempDir::new().unwrap();

    let mut handle = BatchRunner::new()
        .start::<ResampleUpscaler>(BatchConfig::new(temp_dir.path().join("missing")), None)
        .unwrap();
    let events = collect_events(&mut handle.events).await;
    let error = handle.worker.await.unwrap().unwrap_err();

    assert!(matches!(error, BatchError::SourceMissing { .. }));
    assert_eq!(error.scope(), ErrorScope::Fatal);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ProgressEvent::Error(_)));
    assert_eq!(events[1], ProgressEvent::Done(None));

    // 終端イベント後は何も送られない
    assert!(handle.events.recv().await.is_none());
}

#[tokio::test]
async fn test_super_resolution_without_model_aborts_before_archiving() {
    let temp_dir = TempDir::new().unwrap();
    create_chapter(temp_dir.path(), "A", 2);

    let config = BatchConfig::new(temp_dir.path()).with_super_resolution(true);
    let mut handle = BatchRunner::new()
        .start::<ResampleUpscaler>(config, None)
        .unwrap();

    let mut sink = ProgressSink::new(NoOpProgressView::new());
    let state = sink.drain(&mut handle.events).await.clone();
    let error = handle.worker.await.unwrap().unwrap_err();

    assert!(matches!(error, BatchError::ModelUnavailable));
    assert!(state.failed());
    assert!(!state.completion_notice());
    assert!(!temp_dir.path().join("A.cbz").exists());
    assert!(temp_dir.path().join("A").exists());
}

#[tokio::test]
async fn test_model_that_cannot_use_accelerator_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    create_chapter(temp_dir.path(), "A", 1);

    // Accelerated向けの準備を拒否するモデル
    struct AcceleratedResample(ResampleUpscaler);

    impl UpscaleModel for AcceleratedResample {
        fn name(&self) -> String {
            self.0.name()
        }
        fn accelerator_available(&self) -> bool {
            true
        }
        fn prepare(&mut self, target: ComputeTarget) -> anyhow::Result<()> {
            self.0.prepare(target)
        }
        fn infer(
            &self,
            input: &image::RgbImage,
            target: ComputeTarget,
        ) -> anyhow::Result<image::RgbImage> {
            self.0.infer(input, target)
        }
    }

    let config = BatchConfig::new(temp_dir.path()).with_super_resolution(true);
    let mut handle = BatchRunner::new()
        .start(config, Some(AcceleratedResample(ResampleUpscaler::default())))
        .unwrap();
    let events = collect_events(&mut handle.events).await;
    let error = handle.worker.await.unwrap().unwrap_err();

    assert!(matches!(error, BatchError::ModelPreparation { .. }));
    assert!(matches!(&events[0], ProgressEvent::Info(text) if text.starts_with("GPU")));
    assert_eq!(events.last(), Some(&ProgressEvent::Done(None)));
}

#[tokio::test]
async fn test_invalid_images_do_not_fail_the_folder() {
    let temp_dir = TempDir::new().unwrap();
    let chapter = create_chapter(temp_dir.path(), "A", 2);
    fs::write(chapter.join("03.jpg"), b"NOT_A_JPEG").unwrap();
    fs::write(chapter.join("notes.txt"), b"text").unwrap();
    fs::create_dir(chapter.join("extras")).unwrap();

    let mut handle = BatchRunner::new()
        .start::<ResampleUpscaler>(
            BatchConfig::new(temp_dir.path()).with_move_to_done(false),
            None,
        )
        .unwrap();
    let events = collect_events(&mut handle.events).await;
    let summary = handle.worker.await.unwrap().unwrap();

    assert_eq!(summary.files_archived, 2);
    assert_eq!(
        archive_entries(&temp_dir.path().join("A.cbz")),
        vec!["01.jpg", "02.jpg"]
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, ProgressEvent::Error(_))));
}

#[test]
fn test_rename_rejects_file_path() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("file.txt");
    fs::write(&file, b"x").unwrap();

    let error = rename_images(&file).unwrap_err();
    assert!(!error.is_recoverable());
}
