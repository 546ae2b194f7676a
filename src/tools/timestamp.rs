//! 檔案修改時間讀取
//!
//! 命名策略只依賴檔名與修改時間，不讀取檔案內容

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

/// 讀取檔案的修改時間
///
/// 讀取失敗（例如檔案在掃描後被移除）視為該檔案的局部錯誤，
/// 呼叫端應記錄並跳過該檔案，不中斷整個批次
pub fn modified_time(path: &Path) -> Result<DateTime<Local>> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("無法讀取修改時間: {}", path.display()))?;

    Ok(DateTime::<Local>::from(modified))
}
