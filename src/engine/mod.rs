// バッチ処理エンジン
//
// オーケストレーターがワーカー側で処理を進め、進捗はチャネル経由で消費側へ送られる。

pub mod emitter;
pub mod orchestrator;
pub mod runner;

pub use emitter::{NoOpProgressEmitter, ProgressEmitter};
pub use orchestrator::BatchOrchestrator;
pub use runner::{BatchRunner, RunHandle};
