// 進捗ビューの具象実装

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::{ProgressState, ProgressView};
use crate::core::ProgressEvent;

const FOLDER_TEMPLATE: &str = "{prefix:>8} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
const FILE_TEMPLATE: &str = "{prefix:>8} [{bar:40.green/white}] {pos}/{len}";
const PROGRESS_CHARS: &str = "█▓░";

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(PROGRESS_CHARS)
}

/// ターミナルにフォルダとファイルの2段の進捗バーを表示するビュー
pub struct ConsoleProgressView {
    multi: MultiProgress,
    folders: ProgressBar,
    files: ProgressBar,
    quiet: bool,
}

impl Default for ConsoleProgressView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleProgressView {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr(), false)
    }

    /// バーもメッセージも表示しない
    pub fn quiet() -> Self {
        Self::with_target(ProgressDrawTarget::hidden(), true)
    }

    fn with_target(target: ProgressDrawTarget, quiet: bool) -> Self {
        let multi = MultiProgress::with_draw_target(target);

        let folders = multi.add(ProgressBar::new(0));
        folders.set_style(bar_style(FOLDER_TEMPLATE));
        folders.set_prefix("Folder");

        let files = multi.add(ProgressBar::new(0));
        files.set_style(bar_style(FILE_TEMPLATE));
        files.set_prefix("File");

        Self {
            multi,
            folders,
            files,
            quiet,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// バーの描画を崩さずに1行出力する
    fn line(&self, text: String) {
        if self.quiet {
            return;
        }
        if self.multi.println(&text).is_err() {
            eprintln!("{text}");
        }
    }
}

impl ProgressView for ConsoleProgressView {
    fn on_event(&mut self, event: &ProgressEvent, state: &ProgressState) {
        match event {
            ProgressEvent::FolderProgress { index, total, name } => {
                self.folders.set_length(*total as u64);
                self.folders.set_position(*index as u64);
                self.folders.set_message(name.clone());
                self.files.reset();
                self.files.set_length(0);
            }
            ProgressEvent::FileProgress { index, total } => {
                self.files.set_length(*total as u64);
                self.files.set_position(*index as u64);
            }
            ProgressEvent::Info(message) => self.line(format!("ℹ️  {message}")),
            ProgressEvent::Warning(message) => self.line(format!("⚠️  {message}")),
            ProgressEvent::Error(message) => self.line(format!("❌ {message}")),
            ProgressEvent::Done(_) => {
                self.files.finish_and_clear();
                self.folders.finish_and_clear();
                if state.completion_notice() {
                    self.line(format!("✅ {}", state.status));
                } else if state.failed() {
                    self.line(format!("🛑 {}", state.status));
                }
            }
        }
    }
}

/// 何もしないビュー（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressView;

impl NoOpProgressView {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressView for NoOpProgressView {
    fn on_event(&mut self, _event: &ProgressEvent, _state: &ProgressState) {
        // 何もしない
    }
}
