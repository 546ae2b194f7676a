//! 媒體重新命名主模組
//!
//! 將目錄第一層的檔案重新命名為 `YYYY-MM-描述.副檔名`，
//! 先規劃整批再執行，衝突以 `-1`、`-2` 編號解決

use super::description_policy::candidate_for;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::{
    RenamePlan, SuffixStyle, TargetResolver, modified_time, scan_top_level_files,
    validate_directory_exists,
};
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 一批規劃結果
#[derive(Debug)]
pub struct RenameBatch {
    pub plans: Vec<RenamePlan>,
    /// 讀不到修改時間而跳過的檔案數
    pub skipped: usize,
}

/// 執行結果統計
#[derive(Debug, Default)]
pub struct RenameResult {
    pub renamed: usize,
    pub unchanged: usize,
    pub errors: usize,
}

/// 規劃整批重新命名，不改動任何檔案
///
/// 只處理目錄第一層的檔案；讀不到修改時間的檔案記錄後跳過
pub fn plan_renames(directory: &Path) -> Result<RenameBatch> {
    validate_directory_exists(directory)?;

    let files = scan_top_level_files(directory)?;
    let mut resolver = TargetResolver::new();
    let mut plans = Vec::with_capacity(files.len());
    let mut skipped = 0;

    for file in &files {
        let modified = match modified_time(&file.path) {
            Ok(modified) => modified,
            Err(e) => {
                warn!("跳過檔案: {e}");
                skipped += 1;
                continue;
            }
        };

        let file_name = file.path.file_name().unwrap_or_default().to_string_lossy();
        let candidate = candidate_for(&file_name, &modified);
        plans.push(resolver.resolve(&file.path, &candidate, directory, SuffixStyle::Hyphen));
    }

    Ok(RenameBatch { plans, skipped })
}

/// 套用規劃結果，已是正確名稱的計畫不做任何動作
pub fn apply_plans(plans: &[RenamePlan]) -> RenameResult {
    let mut result = RenameResult::default();

    for plan in plans {
        if plan.is_noop() {
            result.unchanged += 1;
            continue;
        }

        match fs::rename(&plan.source, &plan.target) {
            Ok(()) => {
                info!(
                    "重新命名: {} -> {}",
                    plan.source.display(),
                    plan.target.display()
                );
                result.renamed += 1;
            }
            Err(e) => {
                warn!("重新命名失敗 {}: {}", plan.source.display(), e);
                result.errors += 1;
            }
        }
    }

    result
}

/// 媒體重新命名器（互動流程）
pub struct MediaRenamer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl MediaRenamer {
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 媒體檔案重新命名 ===").cyan().bold());

        let directory = self.prompt_directory()?;
        validate_directory_exists(&directory)?;
        self.remember_path(&directory);

        println!("{}", style("掃描與規劃中...").dim());
        let batch = plan_renames(&directory)?;

        if batch.skipped > 0 {
            println!(
                "{}",
                style(format!("警告：{} 個檔案讀不到修改時間，已跳過", batch.skipped)).yellow()
            );
        }

        if batch.plans.is_empty() {
            println!("{}", style("找不到任何檔案").yellow());
            return Ok(());
        }

        self.display_preview(&batch.plans);

        if !self.confirm_rename()? {
            println!("{}", style("已取消，未變更任何檔案").yellow());
            return Ok(());
        }

        let result = self.execute_rename(&batch.plans);
        self.display_summary(&result, batch.skipped);

        Ok(())
    }

    fn prompt_directory(&self) -> Result<PathBuf> {
        let mut input = Input::new().with_prompt("請輸入資料夾路徑");
        if let Some(recent) = self.config.settings.recent_paths.first() {
            input = input.default(recent.clone());
        }
        let path: String = input.interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    fn remember_path(&self, directory: &Path) {
        let mut settings = self.config.settings.clone();
        add_recent_path(&mut settings, &directory.to_string_lossy());
        if let Err(e) = save_settings(&settings) {
            warn!("無法儲存設定: {e}");
        }
    }

    fn confirm_rename(&self) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt("確定要重新命名這些檔案嗎？")
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn display_preview(&self, plans: &[RenamePlan]) {
        println!();
        println!("{}", style("預覽重新命名結果：").cyan());
        println!();

        for plan in plans {
            let old_name = plan.source.file_name().unwrap_or_default().to_string_lossy();
            let new_name = plan.target.file_name().unwrap_or_default().to_string_lossy();

            if plan.is_noop() {
                println!("  {} {}", style("維持:").dim(), old_name);
            } else {
                println!("  {} {}", style("舊:").dim(), old_name);
                println!("  {} {}", style("新:").dim(), new_name);
            }
            println!();
        }
    }

    fn execute_rename(&self, plans: &[RenamePlan]) -> RenameResult {
        let mut result = RenameResult::default();

        let progress_bar = ProgressBar::new(plans.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message("重新命名中...");

        for plan in plans {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                break;
            }

            let partial = apply_plans(std::slice::from_ref(plan));
            result.renamed += partial.renamed;
            result.unchanged += partial.unchanged;
            result.errors += partial.errors;

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
        result
    }

    fn display_summary(&self, result: &RenameResult, skipped: usize) {
        println!();
        println!("{}", style("=== 重新命名結果 ===").cyan().bold());
        println!("  重新命名: {} 個", style(result.renamed).green());
        if result.unchanged > 0 {
            println!("  維持不變: {} 個", style(result.unchanged).dim());
        }
        if skipped > 0 {
            println!("  跳過: {} 個", style(skipped).yellow());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plan_renames_creates_expected_names() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("IMG_20220101_Beach123.JPG"), "a").unwrap();
        fs::write(temp_dir.path().join("20230101-party-night.png"), "b").unwrap();

        let batch = plan_renames(temp_dir.path()).unwrap();
        let targets: Vec<String> = batch
            .plans
            .iter()
            .map(|p| p.target.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert!(targets.contains(&"2022-01-img-beach.jpg".to_string()));
        assert!(targets.contains(&"2023-01-party-night.png".to_string()));
        assert_eq!(batch.skipped, 0);
    }

    #[test]
    fn test_plan_renames_rejects_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(plan_renames(&missing).is_err());
    }

    #[test]
    fn test_collision_adds_hyphen_suffix() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("video1.mov"), "a").unwrap();
        fs::write(temp_dir.path().join("video2.mov"), "b").unwrap();

        let batch = plan_renames(temp_dir.path()).unwrap();
        let targets: Vec<String> = batch
            .plans
            .iter()
            .map(|p| p.target.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        // 兩個檔案描述相同，第二個取得 -1 編號
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().any(|n| n.ends_with("-video.mov")));
        assert!(targets.iter().any(|n| n.ends_with("-video-1.mov")));
    }

    #[test]
    fn test_apply_plans_renames_files() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("photo001-sunset.JPG");
        fs::write(&source, "content").unwrap();

        let batch = plan_renames(temp_dir.path()).unwrap();
        let result = apply_plans(&batch.plans);

        assert_eq!(result.renamed, 1);
        assert_eq!(result.errors, 0);
        assert!(!source.exists());
        assert!(batch.plans[0].target.exists());
        let new_name = batch.plans[0].target.file_name().unwrap().to_string_lossy();
        assert!(new_name.ends_with("-photo-sunset.jpg"));
    }

    #[test]
    fn test_planning_is_idempotent_after_apply() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("IMG_20220101_Beach123.JPG"), "a").unwrap();

        let first = plan_renames(temp_dir.path()).unwrap();
        apply_plans(&first.plans);

        // 再規劃一次，所有檔案都已是正確名稱
        let second = plan_renames(temp_dir.path()).unwrap();
        assert!(second.plans.iter().all(RenamePlan::is_noop));

        let result = apply_plans(&second.plans);
        assert_eq!(result.renamed, 0);
        assert_eq!(result.unchanged, second.plans.len());
    }
}
