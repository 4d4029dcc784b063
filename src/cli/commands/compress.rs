use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::core::{BatchConfig, BatchSummary};
use crate::engine::BatchRunner;
use crate::progress::{ConsoleProgressView, ProgressSink};
use crate::super_resolution::ResampleUpscaler;

/// compressコマンドの入力値
pub struct CompressConfig {
    pub source: PathBuf,
    pub delete: bool,
    pub no_move: bool,
    pub super_resolution: bool,
    pub scale: u32,
    pub done_dir: String,
    pub json: bool,
    pub quiet: bool,
}

impl CompressConfig {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new(&self.source)
            .with_delete_after(self.delete)
            .with_move_to_done(!self.no_move)
            .with_super_resolution(self.super_resolution)
            .with_done_dir_name(&self.done_dir)
    }
}

/// サブフォルダをCBZに圧縮する
pub async fn execute_compress(config: CompressConfig) -> Result<BatchSummary> {
    let batch_config = config.batch_config();

    if !config.quiet && !config.json {
        println!("📦 圧縮元ディレクトリ: {}", config.source.display());
        if batch_config.delete_after() {
            println!("🗑️  圧縮後にサブフォルダを削除します");
        } else if batch_config.move_to_done() {
            println!(
                "📁 圧縮後の移動先: {}",
                batch_config.done_dir().display()
            );
        }
    }

    let model = config
        .super_resolution
        .then(|| ResampleUpscaler::new(config.scale));

    let runner = BatchRunner::new();
    let mut handle = runner.start(batch_config, model)?;

    let view = if config.quiet {
        ConsoleProgressView::quiet()
    } else {
        ConsoleProgressView::new()
    };
    let mut sink = ProgressSink::new(view);
    sink.drain(&mut handle.events).await;

    let summary = handle
        .worker
        .await
        .context("Batch worker panicked")?
        .context("Batch run failed")?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(summary)
}
