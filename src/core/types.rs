// バッチ処理に関連するデータ型定義

use serde::Serialize;
use std::fmt;

/// 超解像モデルを実行する演算装置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComputeTarget {
    /// GPUなどのアクセラレータ
    Accelerated,
    /// 汎用CPU
    Standard,
}

impl ComputeTarget {
    /// アクセラレータが利用可能ならAccelerated、そうでなければStandard
    pub fn resolve(accelerator_available: bool) -> Self {
        if accelerator_available {
            Self::Accelerated
        } else {
            Self::Standard
        }
    }

    pub fn is_accelerated(self) -> bool {
        matches!(self, Self::Accelerated)
    }

    /// 実行開始時に表示する診断メッセージ
    pub fn describe(self, model_name: &str) -> String {
        match self {
            Self::Accelerated => {
                format!("{self}: accelerator available, running '{model_name}' on it")
            }
            Self::Standard => {
                format!("{self}: no accelerator available, running '{model_name}' on the CPU")
            }
        }
    }
}

impl fmt::Display for ComputeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accelerated => write!(f, "GPU"),
            Self::Standard => write!(f, "CPU"),
        }
    }
}

/// バッチ実行全体のサマリー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total_folders: usize,
    pub folders_archived: usize,
    pub folders_skipped: usize,
    pub folders_failed: usize,
    pub files_archived: usize,
    pub file_failures: usize,
    pub post_action_failures: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Completed: {} files processed in {} folders",
            self.files_archived, self.folders_archived
        )?;

        let mut notes = Vec::new();
        if self.folders_skipped > 0 {
            notes.push(format!("{} skipped", self.folders_skipped));
        }
        if self.folders_failed > 0 {
            notes.push(format!("{} failed", self.folders_failed));
        }
        if self.file_failures > 0 {
            notes.push(format!("{} file errors", self.file_failures));
        }
        if self.post_action_failures > 0 {
            notes.push(format!("{} cleanup errors", self.post_action_failures));
        }
        if !notes.is_empty() {
            write!(f, " ({})", notes.join(", "))?;
        }
        Ok(())
    }
}

/// ワーカーから消費側へ送られる進捗イベント
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// フォルダ単位の進捗（1始まり）
    FolderProgress {
        index: usize,
        total: usize,
        name: String,
    },
    /// 現在のフォルダ内のファイル単位の進捗（1始まり）
    FileProgress { index: usize, total: usize },
    Info(String),
    Warning(String),
    Error(String),
    /// 終端イベント。Noneは致命的エラーで中断したことを示す
    Done(Option<BatchSummary>),
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_target_resolution() {
        assert_eq!(ComputeTarget::resolve(true), ComputeTarget::Accelerated);
        assert_eq!(ComputeTarget::resolve(false), ComputeTarget::Standard);
        assert!(ComputeTarget::Accelerated.is_accelerated());
        assert!(!ComputeTarget::Standard.is_accelerated());
    }

    #[test]
    fn test_compute_target_describe() {
        let text = ComputeTarget::Standard.describe("resample-x2");
        assert!(text.starts_with("CPU"));
        assert!(text.contains("resample-x2"));
    }

    #[test]
    fn test_summary_display() {
        let summary = BatchSummary {
            total_folders: 2,
            folders_archived: 1,
            folders_skipped: 1,
            files_archived: 3,
            ..Default::default()
        };

        assert_eq!(
            summary.to_string(),
            "Completed: 3 files processed in 1 folders (1 skipped)"
        );
    }

    #[test]
    fn test_summary_display_without_notes() {
        let summary = BatchSummary {
            total_folders: 1,
            folders_archived: 1,
            files_archived: 5,
            ..Default::default()
        };

        assert_eq!(summary.to_string(), "Completed: 5 files processed in 1 folders");
    }

    #[test]
    fn test_only_done_is_terminal() {
        assert!(ProgressEvent::Done(None).is_terminal());
        assert!(ProgressEvent::Done(Some(BatchSummary::default())).is_terminal());
        assert!(!ProgressEvent::Error("boom".to_string()).is_terminal());
        assert!(!ProgressEvent::FileProgress { index: 1, total: 2 }.is_terminal());
    }
}
