//! 描述式命名策略
//!
//! 從原始檔名導出 `YYYY-MM-描述` 形式的基本檔名：
//! 描述來自去除數字後的檔名主幹，年月優先取檔名中內嵌的日期，
//! 否則退回檔案修改時間

use chrono::{DateTime, Datelike, Local};
use regex::Regex;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::LazyLock;

use crate::tools::CandidateName;

static REGEX_DIGIT_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex"));

static REGEX_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("Invalid regex"));

static REGEX_YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(19|20)\d{2}[-_]?([01]\d)").expect("Invalid regex"));

/// 從檔名主幹導出描述文字
///
/// 去除所有數字，非英數字元的連續區段換成單一連字號，
/// 修剪前後連字號並轉小寫；結果為空時使用 `file`
#[must_use]
pub fn derive_description(stem: &str) -> String {
    let no_digits = REGEX_DIGIT_RUNS.replace_all(stem, "");
    let normalized = REGEX_NON_ALNUM.replace_all(&no_digits, "-");
    let trimmed = normalized.trim_matches('-').to_lowercase();

    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed
    }
}

/// 導出 `YYYY-MM` 年月字串
///
/// 檔名主幹中找得到 4 位年份加 2 位月份（月份限 01–12）就用它，
/// 否則使用修改時間
#[must_use]
pub fn derive_year_month(stem: &str, fallback: &DateTime<Local>) -> String {
    if let Some(caps) = REGEX_YEAR_MONTH.captures(stem) {
        let matched = caps.get(0).map_or("", |m| m.as_str());
        let month = caps.get(2).map_or("", |m| m.as_str());
        if ("01"..="12").contains(&month) {
            return format!("{}-{}", &matched[..4], month);
        }
    }

    format!("{:04}-{:02}", fallback.year(), fallback.month())
}

/// 組合完整候選檔名，副檔名一律轉小寫
#[must_use]
pub fn candidate_for(file_name: &str, modified: &DateTime<Local>) -> CandidateName {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(file_name);
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
        .unwrap_or_default();

    let base_name = format!(
        "{}-{}",
        derive_year_month(stem, modified),
        derive_description(stem)
    );

    CandidateName::new(base_name, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_derive_description_strips_digits() {
        assert_eq!(derive_description("IMG_1234_beach"), "img-beach");
    }

    #[test]
    fn test_derive_description_collapses_separators() {
        assert_eq!(derive_description("party--night__2023"), "party-night");
    }

    #[test]
    fn test_derive_description_empty_falls_back_to_file() {
        assert_eq!(derive_description("1234-__--!!"), "file");
    }

    #[test]
    fn test_derive_year_month_from_embedded_date() {
        let fallback = at(1999, 1);
        assert_eq!(derive_year_month("IMG_20220101_Beach123", &fallback), "2022-01");
    }

    #[test]
    fn test_derive_year_month_with_separator() {
        let fallback = at(1999, 1);
        assert_eq!(derive_year_month("2023_07-trip", &fallback), "2023-07");
    }

    #[test]
    fn test_derive_year_month_rejects_invalid_month() {
        let fallback = at(2021, 11);
        // 13 不是合法月份，退回修改時間
        assert_eq!(derive_year_month("photo_201913_x", &fallback), "2021-11");
    }

    #[test]
    fn test_derive_year_month_fallback_to_mtime() {
        let fallback = at(2024, 7);
        assert_eq!(derive_year_month("IMG_beach", &fallback), "2024-07");
    }

    #[test]
    fn test_candidate_for_worked_example() {
        let modified = at(1999, 1);
        let candidate = candidate_for("IMG_20220101_Beach123.JPG", &modified);

        assert_eq!(candidate.base_name, "2022-01-img-beach");
        assert_eq!(candidate.extension, "jpg");
        assert_eq!(candidate.file_name(), "2022-01-img-beach.jpg");
    }

    #[test]
    fn test_candidate_for_uses_mtime_when_no_embedded_date() {
        let modified = at(2024, 7);
        let candidate = candidate_for("IMG_1234_beach.jpg", &modified);

        assert_eq!(candidate.file_name(), "2024-07-img-beach.jpg");
    }

    #[test]
    fn test_candidate_for_no_extension() {
        let modified = at(2022, 12);
        let candidate = candidate_for("README", &modified);

        assert_eq!(candidate.file_name(), "2022-12-readme");
    }
}
