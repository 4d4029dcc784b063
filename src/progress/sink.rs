use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use super::{ProgressState, ProgressView, SinkControl};
use crate::core::ProgressEvent;

/// タイマー駆動のホストが `poll` を呼ぶ推奨間隔
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 進捗イベントの消費者
///
/// イベントは送出順に1度だけ適用され、終端イベントの後は何も受け取らない。
pub struct ProgressSink<V> {
    state: ProgressState,
    view: V,
}

impl<V: ProgressView> ProgressSink<V> {
    pub fn new(view: V) -> Self {
        Self {
            state: ProgressState::new(),
            view,
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_state(self) -> ProgressState {
        self.state
    }

    /// 終端イベントまで受信を待ち続ける
    ///
    /// 終端イベントなしにチャネルが閉じた場合は失敗した実行として扱う。
    pub async fn drain(&mut self, receiver: &mut UnboundedReceiver<ProgressEvent>) -> &ProgressState {
        while !self.state.finished {
            match receiver.recv().await {
                Some(event) => {
                    if self.handle(event) == SinkControl::Stop {
                        break;
                    }
                }
                None => self.close_without_terminal(),
            }
        }
        &self.state
    }

    /// キューにあるイベントをブロックせずに全て適用する
    ///
    /// 終端イベントを受け取っていればtrueを返す。
    pub fn poll(&mut self, receiver: &mut UnboundedReceiver<ProgressEvent>) -> bool {
        while !self.state.finished {
            match receiver.try_recv() {
                Ok(event) => {
                    if self.handle(event) == SinkControl::Stop {
                        break;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.close_without_terminal(),
            }
        }
        self.state.finished
    }

    fn handle(&mut self, event: ProgressEvent) -> SinkControl {
        let control = self.state.apply(&event);
        self.view.on_event(&event, &self.state);
        control
    }

    fn close_without_terminal(&mut self) {
        tracing::error!("progress channel closed before the run finished");
        self.handle(ProgressEvent::Error(
            "Worker stopped before reporting completion.".to_string(),
        ));
        self.handle(ProgressEvent::Done(None));
    }
}
