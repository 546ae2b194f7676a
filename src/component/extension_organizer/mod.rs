//! 副檔名分類元件
//!
//! 將檔案依副檔名搬入對應的子資料夾

mod main;

pub use main::{
    ExtensionOrganizer, NO_EXTENSION_FOLDER, OrganizePlan, OrganizeResult, apply_moves,
    determine_category, plan_moves,
};
