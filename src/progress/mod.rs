// 進捗の消費側 - イベントを受け取り観測可能な状態を更新する

pub mod sink;
pub mod views;

pub use sink::{ProgressSink, POLL_INTERVAL};
pub use views::{ConsoleProgressView, NoOpProgressView};

use crate::core::{BatchSummary, ProgressEvent};

/// イベント適用後に消費ループを続けるかどうか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    Stop,
}

/// 消費側が保持する観測可能な状態
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub folder_index: usize,
    pub folder_total: usize,
    pub current_folder: Option<String>,
    pub file_index: usize,
    pub file_total: usize,
    pub status: String,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub finished: bool,
    pub summary: Option<BatchSummary>,
    last_was_error: bool,
    completion_notice: bool,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            folder_index: 0,
            folder_total: 0,
            current_folder: None,
            file_index: 0,
            file_total: 0,
            status: "Ready".to_string(),
            warnings: Vec::new(),
            errors: Vec::new(),
            finished: false,
            summary: None,
            last_was_error: false,
            completion_notice: false,
        }
    }
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// イベントを1つ適用する
    pub fn apply(&mut self, event: &ProgressEvent) -> SinkControl {
        match event {
            ProgressEvent::FolderProgress { index, total, name } => {
                self.folder_index = *index;
                self.folder_total = *total;
                self.current_folder = Some(name.clone());
                self.file_index = 0;
                self.file_total = 0;
                self.set_status(format!("Processing folder '{name}'..."));
            }
            ProgressEvent::FileProgress { index, total } => {
                self.file_index = *index;
                self.file_total = *total;
            }
            ProgressEvent::Info(message) => {
                self.set_status(message.clone());
            }
            ProgressEvent::Warning(message) => {
                self.warnings.push(message.clone());
                self.set_status(format!("Warning - {message}"));
            }
            ProgressEvent::Error(message) => {
                self.errors.push(message.clone());
                self.status = format!("Error - {message}");
                self.last_was_error = true;
            }
            ProgressEvent::Done(summary) => {
                // 直前のエラーを表示済みなら完了通知は出さない
                self.completion_notice = !self.last_was_error;
                self.status = match summary {
                    Some(summary) => summary.to_string(),
                    None => "Process finished.".to_string(),
                };
                self.summary = summary.clone();
                self.finished = true;
                self.file_index = 0;
                self.folder_index = 0;
                return SinkControl::Stop;
            }
        }
        SinkControl::Continue
    }

    /// 完了時に通知を出すべきかどうか
    pub fn completion_notice(&self) -> bool {
        self.finished && self.completion_notice
    }

    /// 致命的エラーで中断したかどうか
    pub fn failed(&self) -> bool {
        self.finished && self.summary.is_none()
    }

    fn set_status(&mut self, status: String) {
        self.status = status;
        self.last_was_error = false;
    }
}

/// 状態の変化を表示するビュー
pub trait ProgressView: Send {
    fn on_event(&mut self, event: &ProgressEvent, state: &ProgressState);
}
