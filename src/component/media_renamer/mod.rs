//! 媒體重新命名元件
//!
//! 將檔案重新命名為 `YYYY-MM-描述.副檔名` 格式

pub mod description_policy;
mod main;

pub use description_policy::{candidate_for, derive_description, derive_year_month};
pub use main::{MediaRenamer, RenameBatch, RenameResult, apply_plans, plan_renames};
