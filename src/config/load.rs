use crate::config::save::SETTINGS_FILE;
use crate::config::types::{CategoryTable, Config, UserSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// 編譯時嵌入的分類表（不需要外部檔案）
const CATEGORY_TABLE_JSON: &str = include_str!("../data/category_table.json");

impl Config {
    pub fn new() -> Result<Self> {
        let category_table = Self::load_embedded_category_table()?;
        let settings = Self::load_settings().unwrap_or_default();

        Ok(Self {
            category_table,
            settings,
        })
    }

    fn load_settings() -> Result<UserSettings> {
        let path = Path::new(SETTINGS_FILE);
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// 從編譯時嵌入的 JSON 載入分類表
    fn load_embedded_category_table() -> Result<CategoryTable> {
        serde_json::from_str(CATEGORY_TABLE_JSON).context("無法解析嵌入的分類表")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_embedded_table_parses() {
        let config = Config::new().unwrap();
        assert!(!config.category_table.categories.is_empty());
        assert_eq!(config.category_table.misc_folder, "99_Misc");
    }

    #[test]
    fn test_embedded_table_categorizes_common_files() {
        let config = Config::new().unwrap();
        let table = &config.category_table;
        assert_eq!(table.category_for(Path::new("a.pdf")), "01_Documents");
        assert_eq!(table.category_for(Path::new("a.jpg")), "04_Images");
        assert_eq!(table.category_for(Path::new("a.mp4")), "06_Video");
    }

    #[test]
    fn test_photo_extensions_are_lowercase() {
        let config = Config::new().unwrap();
        let set = config.category_table.photo_extensions_set();
        assert!(set.contains("jpg"));
        assert!(set.contains("heic"));
    }
}
