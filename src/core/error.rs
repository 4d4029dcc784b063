// バッチ処理専用のカスタムエラー型定義
// 各エラーは発生したスコープ（実行全体・サブフォルダ・ファイル・後処理）に分類される

use std::path::{Path, PathBuf};
use thiserror::Error;

/// バッチ処理固有のエラー型
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("source directory does not exist: {}", path.display())]
    SourceMissing { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("super-resolution was requested but no model is loaded")]
    ModelUnavailable,

    #[error("failed to prepare model '{model}' on {target}: {source}")]
    ModelPreparation {
        model: String,
        target: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("a batch run is already in progress")]
    RunInProgress,

    #[error("failed to list {}: {source}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive error for {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("file error for {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("post-processing failed for {}: {source}", path.display())]
    PostAction {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// エラーの影響範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// 実行全体を中断する
    Fatal,
    /// 1つのサブフォルダのみ
    Subfolder,
    /// 1つのファイルのみ
    File,
    /// アーカイブ作成後の削除・移動
    PostAction,
}

impl BatchError {
    pub fn source_missing(path: impl AsRef<Path>) -> Self {
        Self::SourceMissing {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn not_a_directory(path: impl AsRef<Path>) -> Self {
        Self::NotADirectory {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn model_preparation(
        model: impl Into<String>,
        target: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self::ModelPreparation {
            model: model.into(),
            target: target.into(),
            source,
        }
    }

    pub fn listing(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Listing {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn archive(path: impl AsRef<Path>, source: anyhow::Error) -> Self {
        Self::Archive {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn file(path: impl AsRef<Path>, source: anyhow::Error) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn post_action(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::PostAction {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// エラーの影響範囲を取得
    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::SourceMissing { .. }
            | Self::NotADirectory { .. }
            | Self::ModelUnavailable
            | Self::ModelPreparation { .. }
            | Self::RunInProgress => ErrorScope::Fatal,
            Self::Listing { .. } | Self::Archive { .. } => ErrorScope::Subfolder,
            Self::File { .. } => ErrorScope::File,
            Self::PostAction { .. } => ErrorScope::PostAction,
        }
    }

    /// 実行を継続できるかどうか
    pub fn is_recoverable(&self) -> bool {
        self.scope() != ErrorScope::Fatal
    }
}

pub type BatchResult<T> = std::result::Result<T, BatchError>;
