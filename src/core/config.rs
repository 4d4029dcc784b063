// バッチ処理の設定

use std::path::{Path, PathBuf};

/// アーカイブの拡張子
pub const ARCHIVE_EXTENSION: &str = "cbz";

/// Deflate圧縮レベル
pub const COMPRESSION_LEVEL: i64 = 6;

/// アーカイブ対象となる画像の拡張子（小文字）
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// 処理済みフォルダの移動先ディレクトリ名
pub const DEFAULT_DONE_DIR: &str = "Done";

/// バッチ実行の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    source_dir: PathBuf,
    delete_after: bool,
    move_to_done: bool,
    super_resolution: bool,
    done_dir_name: String,
}

impl BatchConfig {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            delete_after: false,
            move_to_done: true,
            super_resolution: false,
            done_dir_name: DEFAULT_DONE_DIR.to_string(),
        }
    }

    pub fn with_delete_after(mut self, enable: bool) -> Self {
        self.delete_after = enable;
        self
    }

    pub fn with_move_to_done(mut self, enable: bool) -> Self {
        self.move_to_done = enable;
        self
    }

    pub fn with_super_resolution(mut self, enable: bool) -> Self {
        self.super_resolution = enable;
        self
    }

    pub fn with_done_dir_name(mut self, name: impl Into<String>) -> Self {
        self.done_dir_name = name.into();
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn delete_after(&self) -> bool {
        self.delete_after
    }

    /// 削除が優先されるため、削除が有効な場合は常にfalse
    pub fn move_to_done(&self) -> bool {
        self.move_to_done && !self.delete_after
    }

    pub fn super_resolution(&self) -> bool {
        self.super_resolution
    }

    pub fn done_dir_name(&self) -> &str {
        &self.done_dir_name
    }

    pub fn done_dir(&self) -> PathBuf {
        self.source_dir.join(&self.done_dir_name)
    }
}
