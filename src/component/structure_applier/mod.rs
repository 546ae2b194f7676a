//! 資料夾結構套用元件
//!
//! 對多個根目錄套用一致的分類資料夾與檔名慣例

mod main;
mod stem_sanitizer;

pub use main::{
    StructureApplier, StructurePlan, StructureResult, apply_structure_plans, ensure_structure,
    plan_root,
};
pub use stem_sanitizer::{MAX_STEM_LENGTH, sanitize_stem};
