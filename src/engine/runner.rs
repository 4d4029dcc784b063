// バッチ実行の起動 - ワーカースレッドでの実行と多重起動の防止

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::{BatchOrchestrator, ProgressEmitter};
use crate::core::{BatchConfig, BatchError, BatchResult, BatchSummary, ProgressEvent};
use crate::super_resolution::UpscaleModel;

/// 実行中フラグの保持者。解放は一度だけ行われ、Drop時にも解放される
struct ActiveRun {
    flag: Arc<AtomicBool>,
    released: AtomicBool,
}

impl ActiveRun {
    fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.flag.store(false, Ordering::Release);
        }
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.release();
    }
}

/// 終端イベントの直前に実行中フラグを解放する送出実装
///
/// 消費側がDoneを受け取った時点で次の実行を開始できる。
struct RunEmitter {
    sender: UnboundedSender<ProgressEvent>,
    run: ActiveRun,
}

impl ProgressEmitter for RunEmitter {
    fn emit(&self, event: ProgressEvent) {
        if event.is_terminal() {
            self.run.release();
        }
        self.sender.emit(event);
    }
}

/// 実行中のバッチへのハンドル
pub struct RunHandle {
    pub events: UnboundedReceiver<ProgressEvent>,
    pub worker: JoinHandle<BatchResult<BatchSummary>>,
}

/// バッチ実行を起動するランナー
///
/// 同時に実行できるバッチは1つだけ。
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    active: Arc<AtomicBool>,
}

impl BatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// ワーカースレッドでバッチを開始する
    ///
    /// 実行中のバッチがある場合は `BatchError::RunInProgress` を返す。
    /// tokioランタイム内から呼び出すこと。
    pub fn start<M>(&self, config: BatchConfig, model: Option<M>) -> BatchResult<RunHandle>
    where
        M: UpscaleModel + 'static,
    {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("batch already running, start request rejected");
            return Err(BatchError::RunInProgress);
        }

        let (sender, events) = mpsc::unbounded_channel();
        let emitter = RunEmitter {
            sender,
            run: ActiveRun {
                flag: Arc::clone(&self.active),
                released: AtomicBool::new(false),
            },
        };

        tracing::info!("starting batch in {}", config.source_dir().display());
        let orchestrator = BatchOrchestrator::new(config, model);
        // パニック時もemitterのDropでフラグが解放される
        let worker = tokio::task::spawn_blocking(move || orchestrator.run(&emitter));

        Ok(RunHandle { events, worker })
    }
}
