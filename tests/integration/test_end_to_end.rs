// エンドツーエンド統合テスト
#[path = "../fixtures/mod.rs"]
mod fixtures;

use fixtures::*;
use manga_utils::{
    progress::{NoOpProgressView, ProgressSink},
    rename_images, BatchConfig, BatchRunner, BatchSummary, ProgressEvent, RenameOutcome,
    ResampleUpscaler,
};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_archives_valid_folder_and_skips_empty_one() {
    let temp_dir = TempDir::new().unwrap();
    create_chapter(temp_dir.path(), "A", 3);
    create_chapter(temp_dir.path(), "B", 0);

    let runner = BatchRunner::new();
    let config = BatchConfig::new(temp_dir.path()).with_move_to_done(false);
    let mut handle = runner.start::<ResampleUpscaler>(config, None).unwrap();

    let mut sink = ProgressSink::new(NoOpProgressView::new());
    let state = sink.drain(&mut handle.events).await.clone();
    let summary = handle.worker.await.unwrap().unwrap();

    assert_eq!(
        archive_entries(&temp_dir.path().join("A.cbz")),
        vec!["01.jpg", "02.jpg", "03.jpg"]
    );
    assert!(!temp_dir.path().join("B.cbz").exists());

    assert_eq!(summary.folders_archived, 1);
    assert_eq!(summary.files_archived, 3);
    assert_eq!(summary.folders_skipped, 1);
    assert_eq!(
        summary.to_string(),
        "Completed: 3 files processed in 1 folders (1 skipped)"
    );

    assert!(state.finished);
    assert_eq!(state.summary, Some(summary));
    assert_eq!(state.warnings.len(), 1);
    assert!(state.warnings[0].contains("'B'"));
    assert!(state.errors.is_empty());
}

#[tokio::test]
async fn test_post_actions() {
    // 削除
    let delete_dir = TempDir::new().unwrap();
    create_chapter(delete_dir.path(), "A", 1);
    let mut handle = BatchRunner::new()
        .start::<ResampleUpscaler>(
            BatchConfig::new(delete_dir.path())
                .with_delete_after(true)
                .with_move_to_done(true),
            None,
        )
        .unwrap();
    collect_events(&mut handle.events).await;
    handle.worker.await.unwrap().unwrap();
    assert!(!delete_dir.path().join("A").exists());
    assert!(!delete_dir.path().join("Done").exists());
    assert!(delete_dir.path().join("A.cbz").exists());

    // 移動
    let move_dir = TempDir::new().unwrap();
    create_chapter(move_dir.path(), "A", 1);
    let mut handle = BatchRunner::new()
        .start::<ResampleUpscaler>(BatchConfig::new(move_dir.path()), None)
        .unwrap();
    collect_events(&mut handle.events).await;
    handle.worker.await.unwrap().unwrap();
    assert!(!move_dir.path().join("A").exists());
    assert!(move_dir.path().join("Done").join("A").join("01.jpg").exists());

    // そのまま
    let keep_dir = TempDir::new().unwrap();
    create_chapter(keep_dir.path(), "A", 1);
    let mut handle = BatchRunner::new()
        .start::<ResampleUpscaler>(
            BatchConfig::new(keep_dir.path()).with_move_to_done(false),
            None,
        )
        .unwrap();
    collect_events(&mut handle.events).await;
    handle.worker.await.unwrap().unwrap();
    assert!(keep_dir.path().join("A").join("01.jpg").exists());
}

#[tokio::test]
async fn test_move_conflict_leaves_folder_untouched() {
    let temp_dir = TempDir::new().unwrap();
    create_chapter(temp_dir.path(), "A", 2);
    let existing = temp_dir.path().join("Done").join("A");
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("marker.txt"), b"keep").unwrap();

    let mut handle = BatchRunner::new()
        .start::<ResampleUpscaler>(BatchConfig::new(temp_dir.path()), None)
        .unwrap();
    let events = collect_events(&mut handle.events).await;
    handle.worker.await.unwrap().unwrap();

    assert!(temp_dir.path().join("A").join("01.jpg").exists());
    assert!(temp_dir.path().join("A").join("02.jpg").exists());
    assert!(existing.join("marker.txt").exists());
    assert!(!existing.join("01.jpg").exists());
    assert!(events
        .iter()
        .any(|event| matches!(event, ProgressEvent::Warning(text) if text.contains("already exists"))));
}

#[tokio::test]
async fn test_inference_failure_keeps_original_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let chapter = create_chapter(temp_dir.path(), "A", 2);
    let original = fs::read(chapter.join("02.jpg")).unwrap();

    let config = BatchConfig::new(temp_dir.path())
        .with_move_to_done(false)
        .with_super_resolution(true);
    let mut handle = BatchRunner::new()
        .start(config, Some(FailingModel::default()))
        .unwrap();
    let events = collect_events(&mut handle.events).await;
    let summary = handle.worker.await.unwrap().unwrap();

    assert_eq!(summary.folders_archived, 1);
    assert_eq!(summary.files_archived, 2);
    assert_eq!(summary.file_failures, 0);
    assert_eq!(
        archive_entry_bytes(&temp_dir.path().join("A.cbz"), "02.jpg"),
        original
    );
    assert!(matches!(&events[0], ProgressEvent::Info(text) if text.starts_with("CPU")));
}

#[tokio::test]
async fn test_upscaled_archive_contains_larger_images() {
    let temp_dir = TempDir::new().unwrap();
    create_chapter(temp_dir.path(), "A", 1);

    let config = BatchConfig::new(temp_dir.path())
        .with_move_to_done(false)
        .with_super_resolution(true);
    let mut handle = BatchRunner::new()
        .start(config, Some(ResampleUpscaler::new(3)))
        .unwrap();
    collect_events(&mut handle.events).await;
    handle.worker.await.unwrap().unwrap();

    let data = archive_entry_bytes(&temp_dir.path().join("A.cbz"), "01.jpg");
    let decoded = image::load_from_memory(&data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (12, 12));
}

#[tokio::test]
async fn test_rename_then_compress() {
    let temp_dir = TempDir::new().unwrap();
    let chapter = temp_dir.path().join("Chapter 1");
    fs::create_dir(&chapter).unwrap();
    write_png(&chapter.join("b.png"), 2);
    write_png(&chapter.join("a.png"), 3);

    let report = rename_images(temp_dir.path()).unwrap();
    assert_eq!(
        report.outcome,
        RenameOutcome::Renamed {
            subfolders: 1,
            files: 2
        }
    );
    assert!(report.failures.is_empty());

    // a.png が 01.png になる
    let first = image::open(chapter.join("01.png")).unwrap();
    assert_eq!(first.width(), 3);
    let second = image::open(chapter.join("02.png")).unwrap();
    assert_eq!(second.width(), 2);

    // 再実行しても変化しない
    let again = rename_images(temp_dir.path()).unwrap();
    assert_eq!(again.outcome, RenameOutcome::NothingRenamed { subfolders: 1 });

    let mut handle = BatchRunner::new()
        .start::<ResampleUpscaler>(
            BatchConfig::new(temp_dir.path()).with_move_to_done(false),
            None,
        )
        .unwrap();
    collect_events(&mut handle.events).await;
    let summary: BatchSummary = handle.worker.await.unwrap().unwrap();

    assert_eq!(summary.files_archived, 2);
    assert_eq!(
        archive_entries(&temp_dir.path().join("Chapter 1.cbz")),
        vec!["01.png", "02.png"]
    );
}
