// テストユーティリティ
// 章フォルダと画像の生成、アーカイブの読み出し、失敗するモデル

#![allow(dead_code)]

use anyhow::{bail, Result};
use image::RgbImage;
use manga_utils::super_resolution::UpscaleModel;
use manga_utils::{ComputeTarget, ProgressEvent};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedReceiver;
use zip::ZipArchive;

/// 指定サイズのJPEGを書き出す
pub fn write_jpeg(path: &Path, size: u32) {
    RgbImage::from_pixel(size, size, image::Rgb([180, 120, 60]))
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// 指定サイズのPNGを書き出す
pub fn write_png(path: &Path, size: u32) {
    RgbImage::from_pixel(size, size, image::Rgb([20, 40, 80]))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// `{root}/{name}` に 01.jpg .. NN.jpg を持つ章フォルダを作成
pub fn create_chapter(root: &Path, name: &str, images: usize) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for i in 1..=images {
        write_jpeg(&dir.join(format!("{i:02}.jpg")), 4);
    }
    dir
}

/// アーカイブ内のエントリ名（格納順）
pub fn archive_entries(archive: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.name_for_index(i).unwrap().to_string())
        .collect();
    names
}

/// アーカイブ内の1エントリの中身
pub fn archive_entry_bytes(archive: &Path, name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut data = Vec::new();
    entry.read_to_end(&mut data).unwrap();
    data
}

/// 終端イベントまでのイベントを集める
pub async fn collect_events(events: &mut UnboundedReceiver<ProgressEvent>) -> Vec<ProgressEvent> {
    let mut collected = Vec::new();
    while let Some(event) = events.recv().await {
        let terminal = event.is_terminal();
        collected.push(event);
        if terminal {
            break;
        }
    }
    collected
}

/// 常に推論に失敗するモデル
#[derive(Debug, Default)]
pub struct FailingModel {
    pub accelerator: bool,
}

impl UpscaleModel for FailingModel {
    fn name(&self) -> String {
        "failing".to_string()
    }

    fn accelerator_available(&self) -> bool {
        self.accelerator
    }

    fn prepare(&mut self, _target: ComputeTarget) -> Result<()> {
        Ok(())
    }

    fn infer(&self, _input: &RgbImage, _target: ComputeTarget) -> Result<RgbImage> {
        bail!("inference backend crashed")
    }
}
