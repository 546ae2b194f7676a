//! 副檔名分類主模組
//!
//! 將目錄第一層的檔案搬進以小寫副檔名命名的子資料夾，
//! 沒有副檔名的檔案歸入 `no_extension`，衝突以 `_1`、`_2` 編號解決

use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::{
    CandidateName, RenamePlan, SuffixStyle, TargetResolver, move_file, scan_top_level_files,
    validate_directory_exists,
};
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 沒有副檔名的檔案歸入的資料夾
pub const NO_EXTENSION_FOLDER: &str = "no_extension";

/// 一筆搬移計畫與其分類
#[derive(Debug, Clone)]
pub struct OrganizePlan {
    pub plan: RenamePlan,
    pub category: String,
}

/// 執行結果統計
#[derive(Debug, Default)]
pub struct OrganizeResult {
    pub moved: usize,
    pub errors: usize,
    /// 各分類實際搬入的檔案數
    pub category_counts: HashMap<String, usize>,
}

/// 依副檔名決定分類資料夾名稱
#[must_use]
pub fn determine_category(path: &Path) -> String {
    path.extension()
        .and_then(OsStr::to_str)
        .map_or_else(|| NO_EXTENSION_FOLDER.to_string(), str::to_lowercase)
}

/// 規劃整批搬移，不改動任何檔案
///
/// 檔名本身維持原樣（含大小寫），只決定目標子資料夾與衝突編號
pub fn plan_moves(directory: &Path) -> Result<Vec<OrganizePlan>> {
    validate_directory_exists(directory)?;

    let files = scan_top_level_files(directory)?;
    let mut resolver = TargetResolver::new();
    let mut plans = Vec::with_capacity(files.len());

    for file in &files {
        let category = determine_category(&file.path);
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
        let plan = resolver.resolve(
            &file.path,
            &candidate,
            &directory.join(&category),
            SuffixStyle::Underscore,
        );

        plans.push(OrganizePlan { plan, category });
    }

    Ok(plans)
}

/// 套用規劃結果，分類資料夾在第一次搬入時建立
pub fn apply_moves(plans: &[OrganizePlan]) -> OrganizeResult {
    let mut result = OrganizeResult::default();

    for entry in plans {
        match move_file(&entry.plan.source, &entry.plan.target) {
            Ok(()) => {
                info!(
                    "移動檔案: {} -> {}",
                    entry.plan.source.display(),
                    entry.plan.target.display()
                );
                result.moved += 1;
                *result
                    .category_counts
                    .entry(entry.category.clone())
                    .or_insert(0) += 1;
            }
            Err(e) => {
                warn!("{e}");
                result.errors += 1;
            }
        }
    }

    result
}

/// 副檔名分類器（互動流程）
pub struct ExtensionOrganizer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl ExtensionOrganizer {
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 依副檔名分類 ===").cyan().bold());

        let directory = self.prompt_directory()?;
        validate_directory_exists(&directory)?;
        self.remember_path(&directory);

        println!("{}", style("掃描與規劃中...").dim());
        let plans = plan_moves(&directory)?;

        if plans.is_empty() {
            println!("{}", style("找不到任何檔案").yellow());
            return Ok(());
        }

        self.display_preview(&plans);

        if !self.confirm_move()? {
            println!("{}", style("已取消，未變更任何檔案").yellow());
            return Ok(());
        }

        let result = self.execute_moves(&plans);
        self.display_summary(&result);

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

    fn confirm_move(&self) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt("確定要搬移這些檔案嗎？")
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn display_preview(&self, plans: &[OrganizePlan]) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in plans {
            *counts.entry(entry.category.as_str()).or_insert(0) += 1;
        }

        println!();
        println!(
            "{}",
            style(format!("共 {} 個檔案，分類如下：", plans.len())).cyan()
        );
        let mut sorted: Vec<_> = counts.into_iter().collect();
        sorted.sort_by_key(|(category, _)| *category);
        for (category, count) in sorted {
            println!("  {}: {} 個", style(category).green(), count);
        }
        println!();
    }

    fn execute_moves(&self, plans: &[OrganizePlan]) -> OrganizeResult {
        let mut result = OrganizeResult::default();

        let progress_bar = ProgressBar::new(plans.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress_bar.set_message("搬移中...");

        for entry in plans {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                break;
            }

            let partial = apply_moves(std::slice::from_ref(entry));
            result.moved += partial.moved;
            result.errors += partial.errors;
            for (category, count) in partial.category_counts {
                *result.category_counts.entry(category).or_insert(0) += count;
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("完成");
        result
    }

    fn display_summary(&self, result: &OrganizeResult) {
        println!();
        println!("{}", style("=== 分類結果 ===").cyan().bold());
        println!("  搬移: {} 個", style(result.moved).green());
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }

        let mut sorted: Vec<_> = result.category_counts.iter().collect();
        sorted.sort_by_key(|(category, _)| category.as_str());
        for (category, count) in sorted {
            println!("    {}: {} 個", category, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_determine_category_lowercases_extension() {
        assert_eq!(determine_category(Path::new("report.TXT")), "txt");
    }

    #[test]
    fn test_determine_category_no_extension() {
        assert_eq!(determine_category(Path::new("README")), NO_EXTENSION_FOLDER);
    }

    #[test]
    fn test_plan_moves_buckets_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("report.TXT"), "a").unwrap();
        fs::write(temp_dir.path().join("photo.jpg"), "b").unwrap();
        fs::write(temp_dir.path().join("README"), "c").unwrap();

        let plans = plan_moves(temp_dir.path()).unwrap();
        assert_eq!(plans.len(), 3);

        let by_name: HashMap<String, &OrganizePlan> = plans
            .iter()
            .map(|p| {
                (
                    p.plan.source.file_name().unwrap().to_string_lossy().to_string(),
                    p,
                )
            })
            .collect();

        // 大寫副檔名歸入小寫分類，但檔名維持原樣
        assert_eq!(by_name["report.TXT"].category, "txt");
        assert_eq!(
            by_name["report.TXT"].plan.target,
            temp_dir.path().join("txt").join("report.TXT")
        );
        assert_eq!(by_name["photo.jpg"].category, "jpg");
        assert_eq!(by_name["README"].category, NO_EXTENSION_FOLDER);
    }

    #[test]
    fn test_apply_moves_creates_category_folders() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();

        let plans = plan_moves(temp_dir.path()).unwrap();
        let result = apply_moves(&plans);

        assert_eq!(result.moved, 2);
        assert_eq!(result.errors, 0);
        assert_eq!(result.category_counts["txt"], 2);
        assert!(temp_dir.path().join("txt").join("a.txt").exists());
        assert!(temp_dir.path().join("txt").join("b.txt").exists());
    }

    #[test]
    fn test_collision_in_category_folder_gets_underscore_suffix() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("txt")).unwrap();
        fs::write(temp_dir.path().join("txt").join("note.txt"), "old").unwrap();
        fs::write(temp_dir.path().join("note.txt"), "new").unwrap();

        let plans = plan_moves(temp_dir.path()).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(
            plans[0].plan.target,
            temp_dir.path().join("txt").join("note_1.txt")
        );
    }
}
