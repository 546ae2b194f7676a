//! 照片遷移主模組
//!
//! 掃描來源根目錄中的照片，依修改時間年份與副檔名
//! 遷移到 `<目的地>/<年份>/<副檔名>/`，可選擇搬移或複製

use super::source_finder::default_cloud_sources;
use crate::config::Config;
use crate::config::save::save_settings;
use crate::tools::{
    CandidateName, RenamePlan, SuffixStyle, TargetResolver, copy_file, ensure_directory_exists,
    modified_time, move_file, scan_files_with_extensions,
};
use anyhow::{Result, bail};
use chrono::Datelike;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 沒有副檔名時使用的子資料夾
pub const OTHER_EXTENSION_FOLDER: &str = "other";

/// 一批遷移規劃
#[derive(Debug)]
pub struct MigrationBatch {
    pub plans: Vec<RenamePlan>,
    /// 已在目的地之下或讀不到修改時間而跳過的檔案數
    pub skipped: usize,
}

/// 執行結果統計
#[derive(Debug, Default)]
pub struct MigrationResult {
    pub moved: usize,
    pub copied: usize,
    pub errors: usize,
    /// 各副檔名（小寫）處理的檔案數
    pub by_extension: HashMap<String, usize>,
}

/// 規劃整批遷移，不改動任何檔案
///
/// 已位於目的地之下的檔案跳過；讀不到修改時間的檔案記錄後跳過。
/// 檔名維持原樣（含大小寫），衝突以 `_1`、`_2` 編號解決
pub fn plan_migration(
    sources: &[PathBuf],
    destination: &Path,
    extensions: &HashSet<String>,
) -> MigrationBatch {
    let files = scan_files_with_extensions(sources, extensions);
    let mut resolver = TargetResolver::new();
    let mut plans = Vec::with_capacity(files.len());
    let mut skipped = 0;

    for file in &files {
        if file.path.starts_with(destination) {
            debug!("跳過已在目的地的檔案: {}", file.path.display());
            skipped += 1;
            continue;
        }

        let modified = match modified_time(&file.path) {
            Ok(modified) => modified,
            Err(e) => {
                warn!("跳過檔案: {e}");
                skipped += 1;
                continue;
            }
        };

        let extension_folder = file
            .path
            .extension()
            .and_then(OsStr::to_str)
            .map_or_else(|| OTHER_EXTENSION_FOLDER.to_string(), str::to_lowercase);
        let target_dir = destination
            .join(modified.year().to_string())
            .join(&extension_folder);

        let stem = file
            .path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or_default();
        let extension = file
            .path
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or_default();

        let candidate = CandidateName::new(stem, extension);
        plans.push(resolver.resolve(&file.path, &candidate, &target_dir, SuffixStyle::Underscore));
    }

    MigrationBatch { plans, skipped }
}

/// 套用規劃結果，`copy_only` 為 true 時保留原檔
pub fn apply_migration(plans: &[RenamePlan], copy_only: bool) -> MigrationResult {
    let mut result = MigrationResult::default();

    for plan in plans {
        let outcome = if copy_only {
            copy_file(&plan.source, &plan.target)
        } else {
            move_file(&plan.source, &plan.target)
        };

        match outcome {
            Ok(()) => {
                let verb = if copy_only { "複製" } else { "搬移" };
                info!(
                    "{}: {} -> {}",
                    verb,
                    plan.source.display(),
                    plan.target.display()
                );
                if copy_only {
                    result.copied += 1;
                } else {
                    result.moved += 1;
                }

                let extension = plan
                    .source
                    .extension()
                    .and_then(OsStr::to_str)
                    .map_or_else(|| OTHER_EXTENSION_FOLDER.to_string(), str::to_lowercase);
                *result.by_extension.entry(extension).or_insert(0) += 1;
            }
            Err(e) => {
                warn!("{e}");
                result.errors += 1;
            }
        }
    }

    result
}

/// 照片遷移器（互動流程）
pub struct PhotoMigrator {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl PhotoMigrator {
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 照片遷移 ===").cyan().bold());

        let sources = self.prompt_sources()?;
        if sources.is_empty() {
            bail!("找不到任何來源資料夾，請手動指定");
        }

        let destination = self.prompt_destination()?;
        ensure_directory_exists(&destination)?;

        let copy_only = self.prompt_mode()?;
        self.remember_settings(&sources, &destination, copy_only);

        println!("{}", style("掃描來源資料夾中...").dim());
        let extensions = self.config.category_table.photo_extensions_set();
        let batch = plan_migration(&sources, &destination, &extensions);

        if batch.skipped > 0 {
            println!(
                "{}",
                style(format!("{} 個檔案已在目的地或無法讀取，跳過", batch.skipped)).yellow()
            );
        }

        if batch.plans.is_empty() {
            println!("{}", style("找不到任何照片").yellow());
            return Ok(());
        }

        self.display_preview(&batch.plans, copy_only);

        if !self.confirm_migration(copy_only)? {
            println!("{}", style("已取消，未變更任何檔案").yellow());
            return Ok(());
        }

        let result = self.execute_migration(&batch.plans, copy_only);
        self.display_summary(&result, batch.skipped);

        Ok(())
    }

    fn prompt_sources(&self) -> Result<Vec<PathBuf>> {
        let defaults: Vec<String> = if self.config.settings.photo.sources.is_empty() {
            default_cloud_sources()
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect()
        } else {
            self.config.settings.photo.sources.clone()
        };

        let mut input = Input::new().with_prompt("來源資料夾（多個以 ; 分隔）");
        if !defaults.is_empty() {
            input = input.default(defaults.join(";"));
        }
        let value: String = input.interact_text()?;

        Ok(value
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    fn prompt_destination(&self) -> Result<PathBuf> {
        let mut input = Input::new().with_prompt("目的地根目錄");
        if !self.config.settings.photo.destination.is_empty() {
            input = input.default(self.config.settings.photo.destination.clone());
        }
        let value: String = input.interact_text()?;
        Ok(PathBuf::from(value.trim()))
    }

    fn prompt_mode(&self) -> Result<bool> {
        let default_index = usize::from(self.config.settings.photo.copy_only);
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("遷移方式")
            .items(&["搬移（原檔移除）", "複製（保留原檔）"])
            .default(default_index)
            .interact()?;
        Ok(selection == 1)
    }

    fn remember_settings(&self, sources: &[PathBuf], destination: &Path, copy_only: bool) {
        let mut settings = self.config.settings.clone();
        settings.photo.sources = sources
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        settings.photo.destination = destination.to_string_lossy().to_string();
        settings.photo.copy_only = copy_only;
        if let Err(e) = save_settings(&settings) {
            warn!("無法儲存設定: {e}");
        }
    }

    fn confirm_migration(&self, copy_only: bool) -> Result<bool> {
        let verb = if copy_only { "複製" } else { "搬移" };
        let confirmed = Confirm::new()
            .with_prompt(format!("確定要{verb}這些照片嗎？"))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn display_preview(&self, plans: &[RenamePlan], copy_only: bool) {
        let verb = if copy_only { "複製" } else { "搬移" };
        println!();
        println!(
            "{}",
            style(format!("預覽：{} 個檔案待{}", plans.len(), verb)).cyan()
        );
        for plan in plans.iter().take(20) {
            println!(
                "  {} -> {}",
                style(plan.source.display()).dim(),
                plan.target.display()
            );
        }
        if plans.len() > 20 {
            println!("  ... 其餘 {} 個省略", plans.len() - 20);
        }
        println!();
    }

    fn execute_migration(&self, plans: &[RenamePlan], copy_only: bool) -> MigrationResult {
        let mut result = MigrationResult::default();

        let progress_bar = ProgressBar::new(plans.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message("遷移中...");

        for plan in plans {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                break;
            }

            let partial = apply_migration(std::slice::from_ref(plan), copy_only);
            result.moved += partial.moved;
            result.copied += partial.copied;
            result.errors += partial.errors;
            for (extension, count) in partial.by_extension {
                *result.by_extension.entry(extension).or_insert(0) += count;
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
        result
    }

    fn display_summary(&self, result: &MigrationResult, skipped: usize) {
        println!();
        println!("{}", style("=== 遷移結果 ===").cyan().bold());
        if result.moved > 0 {
            println!("  搬移: {} 個", style(result.moved).green());
        }
        if result.copied > 0 {
            println!("  複製: {} 個", style(result.copied).green());
        }
        if skipped > 0 {
            println!("  跳過: {} 個", style(skipped).yellow());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }

        let mut sorted: Vec<_> = result.by_extension.iter().collect();
        sorted.sort_by_key(|(extension, _)| extension.as_str());
        for (extension, count) in sorted {
            println!("    {}: {} 個", extension, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use std::fs;
    use tempfile::TempDir;

    fn photo_extensions() -> HashSet<String> {
        ["jpg", "jpeg", "png"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_plan_migration_buckets_by_year_and_extension() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("src");
        let dest_dir = temp_dir.path().join("dest");
        fs::create_dir_all(&source_dir).unwrap();

        let photo = source_dir.join("IMG_001.JPG");
        fs::write(&photo, "x").unwrap();
        // 2021-06-15 12:00:00 UTC
        set_file_mtime(&photo, FileTime::from_unix_time(1_623_758_400, 0)).unwrap();

        let batch = plan_migration(&[source_dir], &dest_dir, &photo_extensions());

        assert_eq!(batch.plans.len(), 1);
        assert_eq!(
            batch.plans[0].target,
            dest_dir.join("2021").join("jpg").join("IMG_001.JPG")
        );
    }

    #[test]
    fn test_plan_migration_ignores_non_photo_files() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("src");
        let dest_dir = temp_dir.path().join("dest");
        fs::create_dir_all(&source_dir).unwrap();
        fs::write(source_dir.join("notes.txt"), "x").unwrap();
        fs::write(source_dir.join("pic.png"), "x").unwrap();

        let batch = plan_migration(&[source_dir], &dest_dir, &photo_extensions());

        assert_eq!(batch.plans.len(), 1);
        assert!(batch.plans[0].source.ends_with("pic.png"));
    }

    #[test]
    fn test_plan_migration_skips_files_under_destination() {
        let temp_dir = TempDir::new().unwrap();
        let dest_dir = temp_dir.path().join("dest");
        fs::create_dir_all(dest_dir.join("2020").join("jpg")).unwrap();
        fs::write(dest_dir.join("2020").join("jpg").join("done.jpg"), "x").unwrap();

        // 目的地本身也是掃描來源之一
        let batch = plan_migration(
            &[temp_dir.path().to_path_buf()],
            &dest_dir,
            &photo_extensions(),
        );

        assert!(batch.plans.is_empty());
        assert_eq!(batch.skipped, 1);
    }

    #[test]
    fn test_plan_migration_collision_gets_underscore_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let source_a = temp_dir.path().join("a");
        let source_b = temp_dir.path().join("b");
        let dest_dir = temp_dir.path().join("dest");
        fs::create_dir_all(&source_a).unwrap();
        fs::create_dir_all(&source_b).unwrap();

        let mtime = FileTime::from_unix_time(1_623_758_400, 0);
        let first = source_a.join("pic.jpg");
        let second = source_b.join("pic.jpg");
        fs::write(&first, "a").unwrap();
        fs::write(&second, "b").unwrap();
        set_file_mtime(&first, mtime).unwrap();
        set_file_mtime(&second, mtime).unwrap();

        let batch = plan_migration(&[source_a, source_b], &dest_dir, &photo_extensions());

        let names: Vec<String> = batch
            .plans
            .iter()
            .map(|p| p.target.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.contains(&"pic.jpg".to_string()));
        assert!(names.contains(&"pic_1.jpg".to_string()));
    }

    #[test]
    fn test_apply_migration_move_removes_source() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("src");
        let dest_dir = temp_dir.path().join("dest");
        fs::create_dir_all(&source_dir).unwrap();
        fs::write(source_dir.join("pic.jpg"), "x").unwrap();

        let batch = plan_migration(&[source_dir.clone()], &dest_dir, &photo_extensions());
        let result = apply_migration(&batch.plans, false);

        assert_eq!(result.moved, 1);
        assert_eq!(result.copied, 0);
        assert_eq!(result.by_extension["jpg"], 1);
        assert!(!source_dir.join("pic.jpg").exists());
        assert!(batch.plans[0].target.exists());
    }

    #[test]
    fn test_apply_migration_copy_keeps_source() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("src");
        let dest_dir = temp_dir.path().join("dest");
        fs::create_dir_all(&source_dir).unwrap();
        fs::write(source_dir.join("pic.jpg"), "x").unwrap();

        let batch = plan_migration(&[source_dir.clone()], &dest_dir, &photo_extensions());
        let result = apply_migration(&batch.plans, true);

        assert_eq!(result.copied, 1);
        assert_eq!(result.moved, 0);
        assert!(source_dir.join("pic.jpg").exists());
        assert!(batch.plans[0].target.exists());
    }
}
