// 超解像モデルの抽象化
//
// 推論の中身は不透明な関数として扱い、モデルと演算装置は実行ごとに注入する。

use anyhow::Result;
use image::RgbImage;
use mockall::automock;

use crate::core::ComputeTarget;

pub mod adapter;
pub mod resample;

pub use adapter::{upscale, UpscaledImage};
pub use resample::ResampleUpscaler;

/// 超解像モデルのトレイト
#[automock]
pub trait UpscaleModel: Send {
    /// ログや診断メッセージに使うモデル名
    fn name(&self) -> String;

    /// アクセラレータ上で実行できるかどうか
    fn accelerator_available(&self) -> bool;

    /// 実行開始時に一度だけ呼ばれ、モデルを演算装置に配置する
    fn prepare(&mut self, target: ComputeTarget) -> Result<()>;

    /// RGB画像を拡大した画像を返す
    fn infer(&self, input: &RgbImage, target: ComputeTarget) -> Result<RgbImage>;

    /// アクセラレータ上のキャッシュを解放する
    fn release_cache(&self, _target: ComputeTarget) {}
}

impl UpscaleModel for Box<dyn UpscaleModel> {
    fn name(&self) -> String {
        self.as_ref().name()
    }

    fn accelerator_available(&self) -> bool {
        self.as_ref().accelerator_available()
    }

    fn prepare(&mut self, target: ComputeTarget) -> Result<()> {
        self.as_mut().prepare(target)
    }

    fn infer(&self, input: &RgbImage, target: ComputeTarget) -> Result<RgbImage> {
        self.as_ref().infer(input, target)
    }

    fn release_cache(&self, target: ComputeTarget) {
        self.as_ref().release_cache(target)
    }
}
