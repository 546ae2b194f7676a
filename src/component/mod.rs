//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod extension_organizer;
pub mod media_renamer;
pub mod photo_migrator;
pub mod structure_applier;

pub use extension_organizer::ExtensionOrganizer;
pub use media_renamer::MediaRenamer;
pub use photo_migrator::PhotoMigrator;
pub use structure_applier::StructureApplier;
