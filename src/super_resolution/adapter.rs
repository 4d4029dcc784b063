// 超解像アダプター - 失敗時は元画像をそのまま使う

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use super::UpscaleModel;
use crate::core::ComputeTarget;

const JPEG_QUALITY: u8 = 95;

/// 超解像の結果
#[derive(Debug)]
pub enum UpscaledImage {
    /// 元画像をそのまま使う（モデルなし・失敗時）
    Original(PathBuf),
    /// 拡大結果を書き込んだ一時ファイル（dropまたはcleanupで削除される）
    Temporary(TempPath),
}

impl UpscaledImage {
    pub fn path(&self) -> &Path {
        match self {
            Self::Original(path) => path.as_path(),
            Self::Temporary(temp) => &**temp,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }

    /// 一時ファイルを削除する。削除失敗はログのみ
    pub fn cleanup(self) {
        if let Self::Temporary(temp) = self {
            let path = temp.to_path_buf();
            if let Err(e) = temp.close() {
                tracing::warn!("could not delete temporary file {}: {e}", path.display());
            }
        }
    }
}

/// 画像を拡大して一時ファイルに書き出す
///
/// モデルがない場合、または途中で失敗した場合は元のパスを返す。
/// アクセラレータ上で実行した場合は、成否にかかわらずキャッシュを解放する。
pub fn upscale<M>(image_path: &Path, model: Option<&M>, target: ComputeTarget) -> UpscaledImage
where
    M: UpscaleModel + ?Sized,
{
    let Some(model) = model else {
        return UpscaledImage::Original(image_path.to_path_buf());
    };

    let result = upscale_to_temp(image_path, model, target);

    if target.is_accelerated() {
        model.release_cache(target);
    }

    match result {
        Ok(temp) => UpscaledImage::Temporary(temp),
        Err(error) => {
            tracing::warn!(
                "super-resolution failed for {}, using original: {error:#}",
                image_path.display()
            );
            UpscaledImage::Original(image_path.to_path_buf())
        }
    }
}

fn upscale_to_temp<M>(image_path: &Path, model: &M, target: ComputeTarget) -> Result<TempPath>
where
    M: UpscaleModel + ?Sized,
{
    let input = image::open(image_path)
        .with_context(|| format!("Failed to decode image: {}", image_path.display()))?
        .to_rgb8();

    let output = model
        .infer(&input, target)
        .with_context(|| format!("Inference failed with model '{}'", model.name()))?;

    let mut temp = tempfile::Builder::new()
        .prefix("manga-sr-")
        .suffix(".jpg")
        .tempfile()
        .context("Failed to create temporary file")?;

    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
            .encode_image(&output)
            .context("Failed to encode upscaled image")?;
        writer.flush().context("Failed to flush upscaled image")?;
    }

    Ok(temp.into_temp_path())
}
