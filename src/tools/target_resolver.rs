//! 目標路徑解析模組
//!
//! 給定來源檔案與命名策略產生的候選檔名，計算出批次內不重複、
//! 也不會覆蓋磁碟上既有檔案的目標路徑

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 命名策略產生的候選檔名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateName {
    /// 基本檔名（不含副檔名）
    pub base_name: String,
    /// 副檔名（不含前導點，可為空字串）
    pub extension: String,
}

impl CandidateName {
    #[must_use]
    pub fn new(base_name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            extension: extension.into(),
        }
    }

    /// 組合完整檔名
    #[must_use]
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.base_name.clone()
        } else {
            format!("{}.{}", self.base_name, self.extension)
        }
    }

    /// 組合帶編號的檔名，編號加在副檔名之前
    fn numbered_file_name(&self, style: SuffixStyle, counter: u32) -> String {
        let separator = style.separator();
        if self.extension.is_empty() {
            format!("{}{}{}", self.base_name, separator, counter)
        } else {
            format!(
                "{}{}{}.{}",
                self.base_name, separator, counter, self.extension
            )
        }
    }
}

/// 衝突編號的分隔風格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixStyle {
    /// `name-1.ext`（媒體重新命名）
    Hyphen,
    /// `name_1.ext`（分類搬移、照片遷移）
    Underscore,
}

impl SuffixStyle {
    const fn separator(self) -> char {
        match self {
            Self::Hyphen => '-',
            Self::Underscore => '_',
        }
    }
}

/// 一筆重新命名／搬移計畫，先規劃後執行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl RenamePlan {
    /// 來源已是正確名稱，執行時不需任何動作
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.source == self.target
    }
}

/// 目標路徑解析器
///
/// 持有批次內已分配的目標路徑集合，確保同一批次中
/// 兩個來源檔案不會解析到同一個尚未寫入磁碟的目標
#[derive(Debug, Default)]
pub struct TargetResolver {
    reserved: HashSet<PathBuf>,
}

impl TargetResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析目標路徑
    ///
    /// 候選名稱若與來源相同則直接接受（已是正確名稱，不重新編號）；
    /// 否則在磁碟或保留集合中已被佔用時，附加遞增編號直到找到空位。
    /// 接受的目標會加入保留集合後回傳。
    pub fn resolve(
        &mut self,
        source: &Path,
        candidate: &CandidateName,
        directory: &Path,
        style: SuffixStyle,
    ) -> RenamePlan {
        let mut target = directory.join(candidate.file_name());
        let mut counter: u32 = 0;

        while self.is_taken(&target, source) {
            counter += 1;
            target = directory.join(candidate.numbered_file_name(style, counter));
        }

        self.reserved.insert(target.clone());

        RenamePlan {
            source: source.to_path_buf(),
            target,
        }
    }

    fn is_taken(&self, target: &Path, source: &Path) -> bool {
        // 來源本身已經叫這個名字，保留原名
        if target == source {
            return false;
        }
        self.reserved.contains(target) || target.exists()
    }
}
