use std::backtrace::Backtrace;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, File, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::files::repository as file_repository;
use crate::files::{
    FileMetadata, FileQuery, FileRecord, FileStatus, RepairAction, RepairRow, StatusReport,
};
use crate::model::error::file_errors::{GetFileError, TagRelationError};
use crate::path_tree::PathTree;
use crate::repository::open_connection;
use crate::tags::service::{self as tag_service, resolve_tag_names};
use crate::util::log_db_error;

/// adds every tag in `tag_names` to the file at `path`, starting to track the file if it isn't already.
///
/// Either every tag is added or none are
pub fn tag_file(path: &str, tag_names: &[String]) -> Result<FileRecord, TagRelationError> {
    let path = absolute_path(path)?;
    let metadata = match fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::error!("Cannot tag {path} because it does not exist!");
            return Err(TagRelationError::FileNotFound);
        }
        Err(e) => {
            log::error!("Failed to stat {path}! Error is {e:?}\n{}", Backtrace::force_capture());
            return Err(TagRelationError::FileSystemError(format!("{path}: {e}")));
        }
    };
    let mut con = open_connection();
    let tx = con.transaction().map_err(|e| {
        TagRelationError::DbError(log_db_error(
            format!("Failed to start transaction to tag {path}"),
            &e,
        ))
    })?;
    let tags = resolve_tag_names(tag_names, &tx)?;
    let existing = file_repository::get_file_by_path(&path, &tx).map_err(|e| {
        TagRelationError::DbError(log_db_error(format!("Failed to retrieve file {path}"), &e))
    })?;
    let file = match existing {
        Some(file) => file,
        None => {
            let file_metadata = read_file_metadata(&path, &metadata)?;
            file_repository::create_file(&file_metadata, &tx).map_err(|e| {
                TagRelationError::DbError(log_db_error(
                    format!("Failed to start tracking file {path}"),
                    &e,
                ))
            })?
        }
    };
    for tag in &tags {
        file_repository::add_tag_to_file(file.id, tag.id, &tx).map_err(|e| {
            TagRelationError::DbError(log_db_error(
                format!("Failed to add tag {} to file {path}", tag.name),
                &e,
            ))
        })?;
    }
    tx.commit().map_err(|e| {
        TagRelationError::DbError(log_db_error(format!("Failed to tag file {path}"), &e))
    })?;
    Ok(file)
}

/// removes the tags from the file at `path`. The file stops being tracked once it has no tags left
pub fn untag_file(path: &str, tag_ids: &[u32]) -> Result<(), TagRelationError> {
    let path = absolute_path(path)?;
    untag(&path, |file_id, con| {
        for tag_id in tag_ids {
            file_repository::remove_tag_from_file(file_id, *tag_id, con)?;
        }
        Ok(())
    })
}

/// removes every tag from the file at `path`, and stops tracking it
pub fn untag_file_all(path: &str) -> Result<(), TagRelationError> {
    let path = absolute_path(path)?;
    untag(&path, |file_id, con| {
        file_repository::remove_tags_from_file(file_id, con)
    })
}

fn untag(
    path: &str,
    remove: impl FnOnce(u32, &Connection) -> Result<(), rusqlite::Error>,
) -> Result<(), TagRelationError> {
    let mut con = open_connection();
    let tx = con.transaction().map_err(|e| {
        TagRelationError::DbError(log_db_error(
            format!("Failed to start transaction to untag {path}"),
            &e,
        ))
    })?;
    let file = match file_repository::get_file_by_path(path, &tx) {
        Ok(Some(file)) => file,
        Ok(None) => {
            log::error!("Cannot untag {path} because it is not tracked!");
            return Err(TagRelationError::FileNotFound);
        }
        Err(e) => {
            return Err(TagRelationError::DbError(log_db_error(
                format!("Failed to retrieve file {path}"),
                &e,
            )))
        }
    };
    remove(file.id, &tx)
        .and_then(|_| prune_file(file.id, &tx))
        .and_then(|_| tx.commit())
        .map_err(|e| TagRelationError::DbError(log_db_error(format!("Failed to untag {path}"), &e)))
}

/// stops tracking the file if it doesn't have any tags left
fn prune_file(file_id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    if file_repository::get_tag_count_for_file(file_id, con)? == 0 {
        log::debug!("Pruning file {file_id} since it no longer has any tags");
        file_repository::delete_file(file_id, con)?;
    }
    Ok(())
}

pub fn get_file(id: u32) -> Result<FileRecord, GetFileError> {
    let con = open_connection();
    match file_repository::get_file(id, &con) {
        Ok(file) => Ok(file),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            log::error!("No file with id {id} exists!\n{}", Backtrace::force_capture());
            Err(GetFileError::NotFound)
        }
        Err(e) => Err(GetFileError::DbError(log_db_error(
            format!("Failed to retrieve file with id {id}"),
            &e,
        ))),
    }
}

pub fn get_file_by_path(path: &str) -> Result<FileRecord, GetFileError> {
    let con = open_connection();
    match file_repository::get_file_by_path(path, &con) {
        Ok(Some(file)) => Ok(file),
        Ok(None) => Err(GetFileError::NotFound),
        Err(e) => Err(GetFileError::DbError(log_db_error(
            format!("Failed to retrieve file {path}"),
            &e,
        ))),
    }
}

pub fn get_all_files() -> Result<Vec<FileRecord>, GetFileError> {
    let con = open_connection();
    file_repository::get_all_files(&con).map_err(|e| {
        GetFileError::DbError(log_db_error("Failed to retrieve all files".to_string(), &e))
    })
}

/// lists the paths of the tracked files matching `query`, sorted
pub fn list_files(query: &FileQuery) -> Result<Vec<String>, TagRelationError> {
    let files = if query.all {
        get_all_files()?
    } else {
        let con = open_connection();
        let (exclude_names, include_names): (Vec<String>, Vec<String>) =
            query.tags.iter().cloned().partition(|it| it.starts_with('-'));
        let exclude_names: Vec<String> = exclude_names
            .into_iter()
            .map(|it| it.trim_start_matches('-').to_string())
            .collect();
        let include: Vec<u32> = resolve_tag_names(&include_names, &con)?
            .iter()
            .map(|it| it.id)
            .collect();
        let exclude: Vec<u32> = resolve_tag_names(&exclude_names, &con)?
            .iter()
            .map(|it| it.id)
            .collect();
        if query.implied {
            tag_service::files_with_tags_implied(&include, &exclude)?
        } else {
            tag_service::files_with_tags(&include, &exclude)?
        }
    };
    let mut tree = PathTree::new();
    for file in &files {
        tree.insert(&file.path, file.is_dir);
    }
    if query.recursive {
        for root in tree.directories().roots() {
            walk_dir(Path::new(&root), &mut |path, is_dir| tree.insert(path, is_dir))?;
        }
    }
    if query.top {
        tree = tree.top_level();
    }
    if query.leaf {
        tree = tree.leaves();
    }
    if query.file {
        tree = tree.files();
    }
    if query.directory {
        tree = tree.directories();
    }
    log::debug!("Listing {} paths for {:?}", tree.len(), query.tags);
    Ok(tree.paths())
}

/// compares every tracked file against the disk.
///
/// Anything on disk under a tracked directory that isn't tracked itself is reported as [`FileStatus::Untagged`]
pub fn status() -> Result<StatusReport, TagRelationError> {
    let con = open_connection();
    let files = file_repository::get_all_files(&con).map_err(|e| {
        TagRelationError::DbError(log_db_error("Failed to retrieve all files".to_string(), &e))
    })?;
    let mut collector = StatusCollector::default();
    let mut tree = PathTree::new();
    for file in &files {
        tree.insert(&file.path, file.is_dir);
        collector.check_file(file)?;
    }
    for root in tree.roots() {
        collector.find_untagged(&root, true)?;
    }
    Ok(collector.report.grouped())
}

/// like [`status`], but only for the files tracked at or below each of `paths`, and whatever is on disk there.
///
/// With `directory`, only the paths themselves are reported and never the contents of directories
pub fn status_paths(paths: &[String], directory: bool) -> Result<StatusReport, TagRelationError> {
    let con = open_connection();
    let mut collector = StatusCollector::default();
    for path in paths {
        let path = absolute_path(path)?;
        let files = if directory {
            tracked_file(&path, &con)?.into_iter().collect()
        } else {
            tracked_at_or_under(&path, &con)?
        };
        for file in &files {
            collector.check_file(file)?;
        }
        collector.find_untagged(&path, !directory)?;
    }
    Ok(collector.report.grouped())
}

/// brings the database back in line with the disk for the files tracked at or below `paths`, or for every file
/// when `paths` is empty.
///
/// Modified files get their fingerprint, size and modification time refreshed. Missing files are looked for by
/// fingerprint among the untracked files under `paths` (or under every tracked root), and are moved to where
/// their contents turn up. Missing files that can't be found are left alone and reported
pub fn repair(paths: &[String]) -> Result<Vec<RepairRow>, TagRelationError> {
    let mut con = open_connection();
    let tx = con.transaction().map_err(|e| {
        TagRelationError::DbError(log_db_error(
            "Failed to start transaction to repair files".to_string(),
            &e,
        ))
    })?;
    let tracked = file_repository::get_all_files(&tx).map_err(|e| {
        TagRelationError::DbError(log_db_error("Failed to retrieve all files".to_string(), &e))
    })?;
    let mut tracked_paths = PathTree::new();
    for file in &tracked {
        tracked_paths.insert(&file.path, file.is_dir);
    }
    let (files, search_paths) = if paths.is_empty() {
        (tracked, tracked_paths.roots())
    } else {
        let search_paths = paths
            .iter()
            .map(|it| absolute_path(it))
            .collect::<Result<Vec<String>, TagRelationError>>()?;
        let mut files: BTreeMap<u32, FileRecord> = BTreeMap::new();
        for path in &search_paths {
            for file in tracked_at_or_under(path, &tx)? {
                files.insert(file.id, file);
            }
        }
        (files.into_values().collect(), search_paths)
    };
    let mut rows: Vec<RepairRow> = Vec::new();
    let mut missing: Vec<FileRecord> = Vec::new();
    for file in files {
        match file_status(&file)? {
            Some(FileStatus::Modified) => {
                let metadata = disk_metadata(&file.path)?;
                update_file(file.id, &metadata, &tx)?;
                log::info!("Refreshed {} from disk", file.path);
                rows.push(RepairRow {
                    path: file.path,
                    action: RepairAction::Updated,
                });
            }
            Some(FileStatus::Missing) => missing.push(file),
            _ => {}
        }
    }
    if !missing.is_empty() {
        let mut moved_files = untracked_by_fingerprint(&missing, &search_paths, &tracked_paths)?;
        for file in missing {
            let found = if file.fingerprint.is_empty() {
                None
            } else {
                moved_files.remove(&file.fingerprint)
            };
            match found {
                Some(new_path) => {
                    let metadata = disk_metadata(&new_path)?;
                    update_file(file.id, &metadata, &tx)?;
                    log::info!("{} was moved to {new_path}", file.path);
                    rows.push(RepairRow {
                        path: new_path,
                        action: RepairAction::Moved(file.path),
                    });
                }
                None => {
                    log::warn!("{}: missing", file.path);
                    rows.push(RepairRow {
                        path: file.path,
                        action: RepairAction::Missing,
                    });
                }
            }
        }
    }
    tx.commit().map_err(|e| {
        TagRelationError::DbError(log_db_error("Failed to repair files".to_string(), &e))
    })?;
    Ok(rows)
}

/// fingerprints the untracked files under `search_paths` that could be one of `missing`, keyed by fingerprint.
/// Only files with the same size as a missing file are read
fn untracked_by_fingerprint(
    missing: &[FileRecord],
    search_paths: &[String],
    tracked_paths: &PathTree,
) -> Result<HashMap<String, String>, TagRelationError> {
    let sizes: HashSet<u64> = missing
        .iter()
        .filter(|it| !it.is_dir)
        .map(|it| it.size)
        .collect();
    let mut candidates: Vec<String> = Vec::new();
    let mut consider = |path: &str, is_dir: bool| {
        if !is_dir && !tracked_paths.contains(path) {
            candidates.push(path.to_string());
        }
    };
    for search_path in search_paths {
        let root = Path::new(search_path);
        if root.is_dir() {
            walk_dir(root, &mut consider)?;
        } else if root.is_file() {
            consider(search_path, false);
        }
    }
    let mut by_fingerprint: HashMap<String, String> = HashMap::new();
    for candidate in candidates {
        match fs::metadata(&candidate) {
            Ok(metadata) if metadata.is_file() && sizes.contains(&metadata.len()) => {}
            _ => continue,
        }
        match fingerprint(&candidate) {
            Ok(hash) => {
                by_fingerprint.entry(hash).or_insert(candidate);
            }
            Err(e) => log::warn!("Failed to fingerprint {candidate}! Error is {e:?}"),
        }
    }
    Ok(by_fingerprint)
}

fn update_file(id: u32, metadata: &FileMetadata, con: &Connection) -> Result<FileRecord, TagRelationError> {
    file_repository::update_file(id, metadata, con).map_err(|e| {
        TagRelationError::DbError(log_db_error(
            format!("Failed to update file {} from disk", metadata.path),
            &e,
        ))
    })
}

fn tracked_file(path: &str, con: &Connection) -> Result<Option<FileRecord>, TagRelationError> {
    file_repository::get_file_by_path(path, con).map_err(|e| {
        TagRelationError::DbError(log_db_error(format!("Failed to retrieve file {path}"), &e))
    })
}

/// the file tracked at `path`, if any, followed by every tracked file below it
fn tracked_at_or_under(path: &str, con: &Connection) -> Result<Vec<FileRecord>, TagRelationError> {
    let mut files: Vec<FileRecord> = tracked_file(path, con)?.into_iter().collect();
    let under = file_repository::get_files_under_path(path, con).map_err(|e| {
        TagRelationError::DbError(log_db_error(
            format!("Failed to retrieve files under {path}"),
            &e,
        ))
    })?;
    files.extend(under);
    Ok(files)
}

/// rows found so far, along with the paths they cover so nothing is reported twice
#[derive(Default)]
struct StatusCollector {
    report: StatusReport,
    reported: PathTree,
}

impl StatusCollector {
    fn add(&mut self, path: &str, status: FileStatus) {
        if !self.reported.contains(path) {
            self.reported.insert(path, false);
            self.report.add_row(path.to_string(), status);
        }
    }

    fn check_file(&mut self, file: &FileRecord) -> Result<(), TagRelationError> {
        if let Some(status) = file_status(file)? {
            self.add(&file.path, status);
        }
        Ok(())
    }

    /// reports `path` as untagged unless it's already covered, followed by everything under it if `contents` is set
    fn find_untagged(&mut self, path: &str, contents: bool) -> Result<(), TagRelationError> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if is_gone(&e) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                log::warn!("{path}: permission denied");
                return Ok(());
            }
            Err(e) => return Err(fs_error(Path::new(path), e)),
        };
        self.add(path, FileStatus::Untagged);
        if contents && metadata.is_dir() {
            walk_dir(Path::new(path), &mut |child, _| {
                self.add(child, FileStatus::Untagged)
            })?;
        }
        Ok(())
    }
}

/// `None` if the file couldn't be looked at because of its permissions
fn file_status(file: &FileRecord) -> Result<Option<FileStatus>, TagRelationError> {
    match fs::metadata(&file.path) {
        Ok(metadata) if is_modified(file, &metadata) => Ok(Some(FileStatus::Modified)),
        Ok(_) => Ok(Some(FileStatus::Tagged)),
        Err(e) if is_gone(&e) => Ok(Some(FileStatus::Missing)),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            log::warn!("{}: permission denied", file.path);
            Ok(None)
        }
        Err(e) => Err(fs_error(Path::new(&file.path), e)),
    }
}

/// a path is gone when it doesn't exist, or when something along the way stopped being a directory
fn is_gone(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn is_modified(file: &FileRecord, metadata: &Metadata) -> bool {
    if file.is_dir != metadata.is_dir() {
        return true;
    }
    let size_changed = !file.is_dir && file.size != metadata.len();
    let mod_time_changed = match metadata.modified() {
        Ok(time) => DateTime::<Utc>::from(time) != file.mod_time,
        Err(_) => false,
    };
    size_changed || mod_time_changed
}

/// visits everything under `dir`, depth first. Symbolic links are reported but never followed.
///
/// Directories that are gone or can't be read are skipped
fn walk_dir(dir: &Path, visit: &mut impl FnMut(&str, bool)) -> Result<(), TagRelationError> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if is_gone(&e) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            log::warn!("{}: permission denied", dir.display());
            return Ok(());
        }
        Err(e) => return Err(fs_error(dir, e)),
    };
    let mut children: Vec<(PathBuf, bool)> = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| fs_error(dir, e))?;
        let file_type = entry.file_type().map_err(|e| fs_error(&entry.path(), e))?;
        children.push((entry.path(), file_type.is_dir()));
    }
    children.sort();
    for (path, is_dir) in children {
        visit(&path.to_string_lossy(), is_dir);
        if is_dir {
            walk_dir(&path, visit)?;
        }
    }
    Ok(())
}

fn fs_error(path: &Path, e: io::Error) -> TagRelationError {
    log::error!(
        "Failed to read {}! Error is {e:?}\n{}",
        path.display(),
        Backtrace::force_capture()
    );
    TagRelationError::FileSystemError(format!("{}: {e}", path.display()))
}

/// paths are stored absolute so they can be compared against each other
fn absolute_path(path: &str) -> Result<String, TagRelationError> {
    std::path::absolute(path)
        .map(|it| it.to_string_lossy().to_string())
        .map_err(|e| {
            log::error!("Failed to resolve absolute path of {path}! Error is {e:?}");
            TagRelationError::FileSystemError(format!("{path}: {e}"))
        })
}

fn disk_metadata(path: &str) -> Result<FileMetadata, TagRelationError> {
    let metadata = fs::metadata(path).map_err(|e| fs_error(Path::new(path), e))?;
    read_file_metadata(path, &metadata)
}

fn read_file_metadata(path: &str, metadata: &Metadata) -> Result<FileMetadata, TagRelationError> {
    let fingerprint = if metadata.is_dir() {
        String::new()
    } else {
        fingerprint(path).map_err(|e| {
            log::error!("Failed to fingerprint {path}! Error is {e:?}\n{}", Backtrace::force_capture());
            TagRelationError::FileSystemError(format!("{path}: {e}"))
        })?
    };
    let mod_time = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::<Utc>::from(UNIX_EPOCH));
    Ok(FileMetadata {
        path: path.to_string(),
        fingerprint,
        mod_time,
        size: metadata.len(),
        is_dir: metadata.is_dir(),
    })
}

/// sha256 of the file contents, as lowercase hex
fn fingerprint(path: &str) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
