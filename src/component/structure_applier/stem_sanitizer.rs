//! 檔名主幹清理
//!
//! 把檔名主幹正規化成可跨平台同步的形式：
//! NFKD 分解後摺疊成 ASCII，小寫化，不允許的字元換成底線並截斷長度

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// 清理後主幹的長度上限
pub const MAX_STEM_LENGTH: usize = 80;

static REGEX_INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("Invalid regex"));

static REGEX_MULTIPLE_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("Invalid regex"));

/// 清理檔名主幹
///
/// 先做 NFKD 分解再保留 ASCII，讓重音字母摺疊成基底字母
/// （分解不出 ASCII 的字元才捨棄）；不允許的字元連續區段換成
/// 單一底線，修剪前後的 `.` 與 `_`；結果為空時使用 `unnamed`
#[must_use]
pub fn sanitize_stem(stem: &str) -> String {
    let ascii_only: String = stem.trim().nfkd().filter(char::is_ascii).collect();
    let lowered = ascii_only.to_lowercase();
    let replaced = REGEX_INVALID_CHARS.replace_all(&lowered, "_");
    let collapsed = REGEX_MULTIPLE_UNDERSCORES.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches(&['.', '_'][..]);

    if trimmed.is_empty() {
        return "unnamed".to_string();
    }

    if trimmed.len() > MAX_STEM_LENGTH {
        // 全是 ASCII，直接以位元組截斷
        return trimmed[..MAX_STEM_LENGTH]
            .trim_end_matches(&['.', '_'][..])
            .to_string();
    }

    trimmed.to_string()
}
