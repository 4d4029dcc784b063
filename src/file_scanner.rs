use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::SUPPORTED_EXTENSIONS;

/// ディレクトリ直下のエントリを列挙する（ファイル名の辞書順）
pub struct FileScanner;

impl FileScanner {
    /// 直下のサブディレクトリ一覧
    pub fn list_subfolders(directory: &Path) -> io::Result<Vec<PathBuf>> {
        Self::immediate_children(directory, |entry| entry.file_type().is_dir())
    }

    /// 直下の通常ファイル一覧
    pub fn list_files(directory: &Path) -> io::Result<Vec<PathBuf>> {
        Self::immediate_children(directory, |entry| entry.file_type().is_file())
    }

    /// 直下の通常ファイルのうち、対応拡張子を持つもの
    pub fn list_image_candidates(directory: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(Self::list_files(directory)?
            .into_iter()
            .filter(|path| Self::has_supported_extension(path))
            .collect())
    }

    pub fn has_supported_extension(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
    }

    fn immediate_children(
        directory: &Path,
        keep: impl Fn(&DirEntry) -> bool,
    ) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if keep(&entry) {
                paths.push(entry.into_path());
            }
        }

        Ok(paths)
    }
}
