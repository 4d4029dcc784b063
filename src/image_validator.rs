use anyhow::{Context, Result};
use image::ImageReader;
use std::path::Path;

/// 画像ファイルの検証
pub struct ImageValidator;

impl ImageValidator {
    /// ヘッダーのみを読み取り、画像として読み込めるかを判定する
    ///
    /// ピクセルデータはデコードしない。I/Oエラーや未対応形式はすべてfalseになる。
    pub fn is_valid_image(path: &Path) -> bool {
        match Self::read_dimensions(path) {
            Ok(_) => true,
            Err(error) => {
                tracing::debug!("not a readable image {}: {error:#}", path.display());
                false
            }
        }
    }

    /// 画像ヘッダーから寸法を取得
    pub fn read_dimensions(path: &Path) -> Result<(u32, u32)> {
        let reader = ImageReader::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("Failed to read header: {}", path.display()))?;

        reader
            .into_dimensions()
            .with_context(|| format!("Failed to decode header: {}", path.display()))
    }
}
