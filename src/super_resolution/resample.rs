use anyhow::{bail, Context, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;

use super::UpscaleModel;
use crate::core::ComputeTarget;

/// 拡大率の上限
pub const MAX_SCALE: u32 = 8;

/// 出力バッファの上限（RGB 8bit、約1.5GB）
const MAX_OUTPUT_BYTES: u64 = 3 << 29;

/// リサンプリングによる拡大モデル
///
/// ニューラルネットワークを使わない決定的な実装。CPU上でのみ動作し、
/// 外部モデルが用意できない環境での標準モデルとして使う。
#[derive(Clone, Debug)]
pub struct ResampleUpscaler {
    scale: u32,
    filter: FilterType,
    prepared: Option<ComputeTarget>,
}

impl Default for ResampleUpscaler {
    fn default() -> Self {
        Self::new(2)
    }
}

impl ResampleUpscaler {
    pub fn new(scale: u32) -> Self {
        Self {
            scale,
            filter: FilterType::Lanczos3,
            prepared: None,
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn prepared_target(&self) -> Option<ComputeTarget> {
        self.prepared
    }
}

impl UpscaleModel for ResampleUpscaler {
    fn name(&self) -> String {
        format!("resample-x{}", self.scale)
    }

    fn accelerator_available(&self) -> bool {
        false
    }

    fn prepare(&mut self, target: ComputeTarget) -> Result<()> {
        if self.scale == 0 {
            bail!("scale factor must be at least 1");
        }
        if target.is_accelerated() {
            bail!("{} has no accelerator backend", self.name());
        }
        self.prepared = Some(target);
        Ok(())
    }

    fn infer(&self, input: &RgbImage, _target: ComputeTarget) -> Result<RgbImage> {
        let width = input
            .width()
            .checked_mul(self.scale)
            .context("output width overflows")?;
        let height = input
            .height()
            .checked_mul(self.scale)
            .context("output height overflows")?;

        let bytes = u64::from(width) * u64::from(height) * 3;
        if bytes > MAX_OUTPUT_BYTES {
            bail!("output {width}x{height} exceeds the {MAX_OUTPUT_BYTES} byte limit");
        }

        Ok(imageops::resize(input, width, height, self.filter))
    }
}
