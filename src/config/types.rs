use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 5;

/// 一條分類規則：資料夾名稱與其對應的副檔名
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub extensions: Vec<String>,
}

/// 編譯時嵌入的分類表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    pub categories: Vec<CategoryRule>,
    /// 沒有任何規則符合時使用的資料夾
    pub misc_folder: String,
    /// 不參與分類、但每次套用時都要確保存在的骨架資料夾
    pub skeleton_folders: Vec<String>,
    /// 照片遷移使用的副檔名（小寫、不含前導點）
    pub photo_extensions: Vec<String>,
}

impl CategoryTable {
    /// 依副檔名（不分大小寫）決定檔案的分類資料夾
    #[must_use]
    pub fn category_for(&self, path: &Path) -> &str {
        let suffix = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        self.categories
            .iter()
            .find(|rule| rule.extensions.iter().any(|ext| ext == &suffix))
            .map_or(self.misc_folder.as_str(), |rule| rule.name.as_str())
    }

    /// 分類目標資料夾（含雜項資料夾），掃描時要跳過其中的檔案
    #[must_use]
    pub fn managed_folders(&self) -> Vec<&str> {
        let mut folders: Vec<&str> = self.categories.iter().map(|rule| rule.name.as_str()).collect();
        folders.push(self.misc_folder.as_str());
        folders
    }

    /// 套用結構時要建立的所有資料夾
    #[must_use]
    pub fn all_folders(&self) -> Vec<&str> {
        let mut folders = self.managed_folders();
        folders.extend(self.skeleton_folders.iter().map(String::as_str));
        folders
    }

    #[must_use]
    pub fn photo_extensions_set(&self) -> HashSet<String> {
        self.photo_extensions
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }
}

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::EnUs => "English",
            Self::ZhTw => "繁體中文",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ZhTw
    }
}

/// 照片遷移的預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoMigrationSettings {
    /// 來源根目錄；留空時改用環境變數探索雲端同步資料夾
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub destination: String,
    /// true 表示複製而非搬移
    #[serde(default)]
    pub copy_only: bool,
}

/// 使用者設定，存於工作目錄的 settings.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub recent_paths: Vec<String>,
    #[serde(default)]
    pub photo: PhotoMigrationSettings,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub category_table: CategoryTable,
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CategoryTable {
        CategoryTable {
            categories: vec![
                CategoryRule {
                    name: "01_Documents".to_string(),
                    extensions: vec!["pdf".to_string(), "txt".to_string()],
                },
                CategoryRule {
                    name: "04_Images".to_string(),
                    extensions: vec!["jpg".to_string()],
                },
            ],
            misc_folder: "99_Misc".to_string(),
            skeleton_folders: vec!["00_Inbox".to_string()],
            photo_extensions: vec!["jpg".to_string()],
        }
    }

    #[test]
    fn test_category_for_known_extension() {
        assert_eq!(table().category_for(Path::new("report.pdf")), "01_Documents");
    }

    #[test]
    fn test_category_for_is_case_insensitive() {
        assert_eq!(table().category_for(Path::new("report.TXT")), "01_Documents");
    }

    #[test]
    fn test_category_for_unknown_extension_falls_back() {
        assert_eq!(table().category_for(Path::new("data.xyz")), "99_Misc");
    }

    #[test]
    fn test_category_for_no_extension_falls_back() {
        assert_eq!(table().category_for(Path::new("README")), "99_Misc");
    }

    #[test]
    fn test_all_folders_include_skeleton() {
        let table = table();
        let folders = table.all_folders();
        assert!(folders.contains(&"99_Misc"));
        assert!(folders.contains(&"00_Inbox"));
    }
}
