//! 檔案搬移與複製
//!
//! rename 失敗時（可能是跨檔案系統）改用複製後刪除

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

use crate::tools::ensure_directory_exists;

/// 搬移檔案到目標路徑，必要時建立目標資料夾
pub fn move_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        ensure_directory_exists(parent)?;
    }

    match fs::rename(source, target) {
        Ok(()) => {
            debug!("移動檔案: {} -> {}", source.display(), target.display());
            Ok(())
        }
        Err(rename_err) => {
            copy_and_delete(source, target).with_context(|| {
                format!(
                    "移動檔案失敗: {} -> {} (rename 錯誤: {})",
                    source.display(),
                    target.display(),
                    rename_err
                )
            })
        }
    }
}

/// 複製檔案到目標路徑，保留原檔
pub fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        ensure_directory_exists(parent)?;
    }

    fs::copy(source, target)
        .with_context(|| format!("複製檔案失敗: {} -> {}", source.display(), target.display()))?;

    debug!("複製檔案: {} -> {}", source.display(), target.display());
    Ok(())
}

fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
    fs::copy(source, target)
        .with_context(|| format!("複製檔案失敗: {} -> {}", source.display(), target.display()))?;

    fs::remove_file(source).with_context(|| format!("刪除原檔案失敗: {}", source.display()))?;

    Ok(())
}
