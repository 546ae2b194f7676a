//! 資料夾結構套用主模組
//!
//! 對一個或多個根目錄套用固定的分類資料夾結構：
//! 建立分類與骨架資料夾、清理檔名主幹、把檔案遞迴搬入對應分類

use super::stem_sanitizer::sanitize_stem;
use crate::config::{CategoryTable, Config};
use crate::tools::{
    CandidateName, RenamePlan, SuffixStyle, TargetResolver, ensure_directory_exists, move_file,
    scan_all_files, validate_directory_exists,
};
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 一筆結構化搬移計畫與其分類
#[derive(Debug, Clone)]
pub struct StructurePlan {
    pub plan: RenamePlan,
    pub category: String,
}

/// 單一根目錄的執行結果
#[derive(Debug, Default)]
pub struct StructureResult {
    pub moved: usize,
    pub skipped: usize,
    pub errors: usize,
    pub category_counts: HashMap<String, usize>,
}

/// 建立所有分類與骨架資料夾
pub fn ensure_structure(table: &CategoryTable, root: &Path) -> Result<()> {
    for folder in table.all_folders() {
        ensure_directory_exists(&root.join(folder))?;
    }
    Ok(())
}

/// 規劃單一根目錄的搬移，不改動任何檔案
///
/// 直接位於分類資料夾內的檔案視為已整理，跳過以避免反覆搬動；
/// 搬移目標使用清理後的主幹與小寫副檔名，衝突以 `_1`、`_2` 編號
pub fn plan_root(table: &CategoryTable, root: &Path) -> Result<(Vec<StructurePlan>, usize)> {
    validate_directory_exists(root)?;

    let managed: Vec<&str> = table.managed_folders();
    let files = scan_all_files(root)?;
    let mut resolver = TargetResolver::new();
    let mut plans = Vec::new();
    let mut skipped = 0;

    for file in &files {
        let parent_name = file
            .path
            .parent()
            .and_then(Path::file_name)
            .and_then(OsStr::to_str)
            .unwrap_or_default();

        if managed.contains(&parent_name) {
            debug!("跳過已分類的檔案: {}", file.path.display());
            skipped += 1;
            continue;
        }

        let category = table.category_for(&file.path).to_string();
        let stem = file
            .path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or_default();
        let extension = file
            .path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .unwrap_or_default();

        let candidate = CandidateName::new(sanitize_stem(stem), extension);
        let plan = resolver.resolve(
            &file.path,
            &candidate,
            &root.join(&category),
            SuffixStyle::Underscore,
        );

        plans.push(StructurePlan { plan, category });
    }

    Ok((plans, skipped))
}

/// 套用規劃結果
pub fn apply_structure_plans(plans: &[StructurePlan]) -> StructureResult {
    let mut result = StructureResult::default();

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

/// 資料夾結構套用器（互動流程）
pub struct StructureApplier {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl StructureApplier {
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 套用資料夾結構 ===").cyan().bold());

        let roots = self.prompt_roots()?;
        for root in &roots {
            validate_directory_exists(root)?;
        }

        let table = &self.config.category_table;
        let mut all_plans: Vec<(PathBuf, Vec<StructurePlan>, usize)> = Vec::new();

        for root in &roots {
            println!(
                "{}",
                style(format!("規劃根目錄: {}", root.display())).dim()
            );
            ensure_structure(table, root)?;
            let (plans, skipped) = plan_root(table, root)?;
            all_plans.push((root.clone(), plans, skipped));
        }

        self.display_preview(&all_plans);

        let total: usize = all_plans.iter().map(|(_, plans, _)| plans.len()).sum();
        if total == 0 {
            println!("{}", style("沒有需要搬移的檔案").yellow());
            return Ok(());
        }

        if !self.confirm_apply()? {
            println!("{}", style("已取消，未變更任何檔案").yellow());
            return Ok(());
        }

        for (root, plans, skipped) in &all_plans {
            let result = self.execute_plans(plans);
            self.display_summary(root, &result, *skipped);
        }

        Ok(())
    }

    fn prompt_roots(&self) -> Result<Vec<PathBuf>> {
        let input: String = Input::new()
            .with_prompt("請輸入根目錄路徑（多個以 ; 分隔）")
            .interact_text()?;

        Ok(input
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect())
    }

    fn confirm_apply(&self) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt("確定要套用資料夾結構嗎？")
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn display_preview(&self, all_plans: &[(PathBuf, Vec<StructurePlan>, usize)]) {
        println!();
        for (root, plans, skipped) in all_plans {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for entry in plans {
                *counts.entry(entry.category.as_str()).or_insert(0) += 1;
            }

            println!(
                "{}",
                style(format!(
                    "{}: {} 個待搬移，{} 個已分類",
                    root.display(),
                    plans.len(),
                    skipped
                ))
                .cyan()
            );
            let mut sorted: Vec<_> = counts.into_iter().collect();
            sorted.sort_by_key(|(category, _)| *category);
            for (category, count) in sorted {
                println!("  {}: {} 個", style(category).green(), count);
            }
        }
        println!();
    }

    fn execute_plans(&self, plans: &[StructurePlan]) -> StructureResult {
        let mut result = StructureResult::default();

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

            let partial = apply_structure_plans(std::slice::from_ref(entry));
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

    fn display_summary(&self, root: &Path, result: &StructureResult, skipped: usize) {
        println!();
        println!(
            "{}",
            style(format!("=== {} ===", root.display())).cyan().bold()
        );
        println!("  搬移: {} 個", style(result.moved).green());
        if skipped > 0 {
            println!("  已分類（跳過）: {} 個", style(skipped).dim());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }
    }
}
