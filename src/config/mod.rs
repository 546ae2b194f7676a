pub mod load;
pub mod save;
pub mod types;

pub use types::{
    CategoryRule, CategoryTable, Config, Language, MAX_RECENT_PATHS, PhotoMigrationSettings,
    UserSettings,
};
