use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::descriptor::{clean_description, write_descriptor, DescriptorFields, SeriesDescriptor};

/// describeコマンドの入力値
pub struct DescribeConfig {
    pub folder: PathBuf,
    pub title: Option<String>,
    pub author: String,
    pub artist: String,
    pub description: String,
    pub genres: String,
    pub status: String,
    pub nsfw: bool,
}

/// フォルダにdetails.jsonを書き出す
pub async fn execute_describe(config: DescribeConfig) -> Result<PathBuf> {
    // タイトル未指定ならフォルダ名を使う
    let title = match config.title {
        Some(title) => title,
        None => config
            .folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let descriptor = SeriesDescriptor::from_fields(DescriptorFields {
        title,
        author: config.author,
        artist: config.artist,
        description: clean_description(&config.description),
        genres: config.genres,
        status: config.status,
        adult: config.nsfw,
    })?;

    let path = write_descriptor(&config.folder, &descriptor)
        .with_context(|| format!("Failed to write descriptor into {}", config.folder.display()))?;

    println!("✅ JSONファイルを保存しました: {}", path.display());
    Ok(path)
}
