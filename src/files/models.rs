use chrono::{DateTime, Utc};

/// represents a row in the file table: a path on disk that has at least one tag
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FileRecord {
    pub id: u32,
    /// absolute path of the file on disk
    pub path: String,
    /// sha256 of the file contents. Empty for directories
    pub fingerprint: String,
    /// modification time of the file when it was last tagged
    pub mod_time: DateTime<Utc>,
    pub size: u64,
    pub is_dir: bool,
}

/// everything about a file needed to start tracking it. The id is assigned by the database
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FileMetadata {
    pub path: String,
    pub fingerprint: String,
    pub mod_time: DateTime<Utc>,
    pub size: u64,
    pub is_dir: bool,
}

/// filters for [`crate::files::service::list_files`]
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FileQuery {
    /// tag names files must have. Names starting with `-` are tags files must _not_ have
    pub tags: Vec<String>,
    /// list every tracked file, ignoring `tags`
    pub all: bool,
    /// only the top-most matches, excludes the contents of matching directories
    pub top: bool,
    /// only the bottom-most matches
    pub leaf: bool,
    /// only files
    pub file: bool,
    /// only directories
    pub directory: bool,
    /// also list everything on disk under each matching directory
    pub recursive: bool,
    /// treat files carrying a tag that implies an included tag as carrying the included tag
    pub implied: bool,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileStatus {
    /// tracked, and unchanged on disk
    Tagged,
    /// tracked, but the size or modification time on disk differs
    Modified,
    /// tracked, but no longer on disk
    Missing,
    /// on disk under a tracked directory, but not tracked itself
    Untagged,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StatusRow {
    pub path: String,
    pub status: FileStatus,
}

/// the result of comparing the database against the disk.
/// Rows are grouped by status: tagged, modified, missing, then untagged
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct StatusReport {
    pub rows: Vec<StatusRow>,
}

impl StatusReport {
    pub fn add_row(&mut self, path: String, status: FileStatus) {
        self.rows.push(StatusRow { path, status });
    }

    /// reorders the rows so each status is grouped together
    pub fn grouped(self) -> StatusReport {
        let order = [
            FileStatus::Tagged,
            FileStatus::Modified,
            FileStatus::Missing,
            FileStatus::Untagged,
        ];
        let mut rows = self.rows;
        rows.sort_by_key(|row| order.iter().position(|it| *it == row.status));
        StatusReport { rows }
    }
}

/// what [`crate::files::service::repair`] did to a tracked file
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RepairAction {
    /// the file's contents were found at a new path. Holds the path it used to be tracked under
    Moved(String),
    /// the stored fingerprint, size and modification time were refreshed from disk
    Updated,
    /// the file is gone, and nothing untracked on disk has the same contents
    Missing,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RepairRow {
    /// where the file is tracked after the repair
    pub path: String,
    pub action: RepairAction,
}
