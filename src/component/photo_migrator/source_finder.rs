//! 雲端同步資料夾探索
//!
//! 未指定來源時，從環境變數找出 OneDrive 同步資料夾

use std::path::PathBuf;

/// OneDrive 安裝時會設定的環境變數
const ONEDRIVE_KEYS: [&str; 3] = ["OneDrive", "OneDriveConsumer", "OneDriveCommercial"];

/// 從環境變數探索預設的雲端同步資料夾
///
/// 只回傳實際存在的路徑，去重並保持探索順序
#[must_use]
pub fn default_cloud_sources() -> Vec<PathBuf> {
    discover_sources(|key| std::env::var(key).ok())
}

/// 以自訂查詢函式探索，方便測試
pub fn discover_sources(lookup: impl Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    for key in ONEDRIVE_KEYS {
        if let Some(value) = lookup(key) {
            candidates.push(PathBuf::from(value));
        }
    }

    if let Some(home) = lookup("USERPROFILE").or_else(|| lookup("HOME")) {
        candidates.push(PathBuf::from(home).join("OneDrive"));
    }

    let mut unique: Vec<PathBuf> = Vec::new();
    for path in candidates {
        if !unique.contains(&path) && path.exists() {
            unique.push(path);
        }
    }

    unique
}
