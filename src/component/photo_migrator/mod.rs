//! 照片遷移元件
//!
//! 將照片依年份與副檔名遷移到目的地根目錄

mod main;
mod source_finder;

pub use main::{
    MigrationBatch, MigrationResult, OTHER_EXTENSION_FOLDER, PhotoMigrator, apply_migration,
    plan_migration,
};
pub use source_finder::{default_cloud_sources, discover_sources};
