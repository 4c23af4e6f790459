pub mod file_errors;
pub mod implication_errors;
pub mod tag_errors;
pub mod vfs_errors;
