//! 檔案掃描模組
//!
//! 提供單層與遞迴兩種掃描，結果一律按路徑排序，
//! 讓後續的目標路徑解析順序固定、可重現

use anyhow::Result;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
}

/// 掃描目錄第一層的檔案，不進入子目錄
pub fn scan_top_level_files(directory: &Path) -> Result<Vec<FileInfo>> {
    let mut files: Vec<FileInfo> = fs::read_dir(directory)?
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            if !metadata.is_file() {
                return None;
            }
            Some(FileInfo {
                path: entry.path(),
                size: metadata.len(),
            })
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// 遞迴掃描目錄下所有檔案
pub fn scan_all_files(directory: &Path) -> Result<Vec<FileInfo>> {
    let mut files: Vec<FileInfo> = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(FileInfo {
                path: entry.into_path(),
                size: metadata.len(),
            })
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// 平行遞迴掃描多個來源根目錄，只保留符合副檔名集合的檔案
///
/// 副檔名比對不分大小寫；不存在的根目錄直接略過。
/// 掃描本身平行，回傳前重新排序，解析階段仍是循序且順序固定
pub fn scan_files_with_extensions(
    roots: &[PathBuf],
    extensions: &HashSet<String>,
) -> Vec<FileInfo> {
    let mut files: Vec<FileInfo> = roots
        .iter()
        .filter(|root| root.exists())
        .flat_map(|root| {
            WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .par_bridge()
                .filter_map(|entry| {
                    let extension = entry
                        .path()
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map(str::to_lowercase)?;
                    if !extensions.contains(&extension) {
                        return None;
                    }
                    let metadata = entry.metadata().ok()?;
                    Some(FileInfo {
                        path: entry.into_path(),
                        size: metadata.len(),
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect();

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
