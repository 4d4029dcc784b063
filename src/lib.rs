// マンガ章フォルダの整理ツール
//
// 連番リネーム、超解像による拡大、CBZアーカイブ化、シリーズ情報の出力を提供する。

pub mod archive_builder;
pub mod cli;
pub mod core;
pub mod descriptor;
pub mod engine;
pub mod file_scanner;
pub mod image_validator;
pub mod progress;
pub mod renamer;
pub mod super_resolution;

// 公開API
pub use archive_builder::{build_archive, ArchiveOutcome};
pub use crate::core::{BatchConfig, BatchError, BatchResult, BatchSummary, ComputeTarget, ProgressEvent};
pub use descriptor::{write_descriptor, DescriptorFields, SeriesDescriptor};
pub use engine::{BatchOrchestrator, BatchRunner, ProgressEmitter, RunHandle};
pub use progress::{ProgressSink, ProgressState, ProgressView};
pub use renamer::{rename_images, RenameOutcome, RenameReport};
pub use super_resolution::{ResampleUpscaler, UpscaleModel};
