// シリーズ情報ファイル（details.json）の生成

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 出力ファイル名
pub const DESCRIPTOR_FILE_NAME: &str = "details.json";

/// 成人向け作品に付与するジャンル
pub const ADULT_GENRE: &str = "NSFW";

/// 状態の既定値（"1" = 完結、"0" = 連載中）
pub const DEFAULT_STATUS: &str = "1";

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Destination is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to serialize descriptor: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 入力フォームの値（未加工）
#[derive(Debug, Clone, Default)]
pub struct DescriptorFields {
    pub title: String,
    pub author: String,
    pub artist: String,
    pub description: String,
    /// カンマ区切りのジャンル
    pub genres: String,
    pub status: String,
    pub adult: bool,
}

/// 外部リーダーが読み込むシリーズ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub title: String,
    pub author: String,
    pub artist: String,
    pub description: String,
    pub genre: Vec<String>,
    pub status: String,
}

impl SeriesDescriptor {
    /// フォームの値を正規化して組み立てる
    pub fn from_fields(fields: DescriptorFields) -> Result<Self, DescriptorError> {
        let title = fields.title.trim();
        if title.is_empty() {
            return Err(DescriptorError::EmptyTitle);
        }

        let mut genre: Vec<String> = fields
            .genres
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        if fields.adult && !genre.iter().any(|tag| tag == ADULT_GENRE) {
            genre.push(ADULT_GENRE.to_string());
        }

        let status = match fields.status.trim() {
            "" => DEFAULT_STATUS.to_string(),
            status => status.to_string(),
        };

        Ok(Self {
            title: title.to_string(),
            author: fields.author.trim().to_string(),
            artist: fields.artist.trim().to_string(),
            description: fields.description.trim().to_string(),
            genre,
            status,
        })
    }
}

/// 説明文のHTMLタグを除去する（<br>は改行に置換）
pub fn clean_description(raw: &str) -> String {
    raw.replace("<br>", "\n")
        .replace("<i>", "")
        .replace("</i>", "")
}

/// `{folder}/details.json` を4スペースインデントで書き出す
pub fn write_descriptor(
    folder: &Path,
    descriptor: &SeriesDescriptor,
) -> Result<PathBuf, DescriptorError> {
    if !folder.is_dir() {
        return Err(DescriptorError::NotADirectory {
            path: folder.to_path_buf(),
        });
    }

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    descriptor.serialize(&mut serializer)?;

    let path = folder.join(DESCRIPTOR_FILE_NAME);
    fs::write(&path, buffer).map_err(|source| DescriptorError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!("wrote {}", path.display());
    Ok(path)
}
