// 進捗イベントの送出 - ワーカー側からの唯一の出口

use tokio::sync::mpsc::UnboundedSender;

use crate::core::ProgressEvent;

/// 進捗イベントを送出するトレイト
pub trait ProgressEmitter: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

impl ProgressEmitter for UnboundedSender<ProgressEvent> {
    fn emit(&self, event: ProgressEvent) {
        // 受信側が閉じていても処理は続行する
        if self.send(event).is_err() {
            tracing::debug!("progress receiver dropped, event discarded");
        }
    }
}

/// 何もしない送出実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressEmitter;

impl NoOpProgressEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressEmitter for NoOpProgressEmitter {
    fn emit(&self, _event: ProgressEvent) {
        // 何もしない
    }
}
