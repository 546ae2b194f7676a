mod file_mover;
mod file_scanner;
mod path_validator;
mod target_resolver;
mod timestamp;

pub use file_mover::{copy_file, move_file};
pub use file_scanner::{FileInfo, scan_all_files, scan_files_with_extensions, scan_top_level_files};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use target_resolver::{CandidateName, RenamePlan, SuffixStyle, TargetResolver};
pub use timestamp::modified_time;
