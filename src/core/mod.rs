// コアレイヤー - 基盤となる型、設定、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod config;
pub mod error;
pub mod types;

// 公開API
pub use config::{BatchConfig, ARCHIVE_EXTENSION, COMPRESSION_LEVEL, SUPPORTED_EXTENSIONS};
pub use error::{BatchError, BatchResult, ErrorScope};
pub use types::{BatchSummary, ComputeTarget, ProgressEvent};
