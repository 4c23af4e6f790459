use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

use crate::files::repository as file_repository;
use crate::files::FileRecord;
use crate::model::error::vfs_errors::VfsError;
use crate::repository::open_connection;
use crate::tags::repository as tag_repository;
use crate::util::log_db_error;
use crate::vfs::entry_name::{decode_entry_name, encode_entry_name};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EntryKind {
    Directory,
    Symlink,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct EntryAttr {
    pub kind: EntryKind,
    /// for tag directories this is how many files are in them, not a byte count
    pub size: u64,
    pub mtime: SystemTime,
    pub perm: u16,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// what a virtual path points at
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ResolvedPath {
    /// the mount point itself, or anything outside the tag root
    TopLevel,
    TagRoot,
    /// `tag_ids` holds every tag in the path, in order
    TagDirectory { tag_ids: Vec<u32> },
    /// `tag_ids` holds the tags in the path leading up to the file
    FileEntry { tag_ids: Vec<u32>, file_id: u32 },
}

/// answers filesystem requests by reading virtual paths as chains of tag filters.
///
/// Paths are relative to the mount point and separated with `/`; `tags/music/rock` is the directory of
/// files that have both `music` and `rock`. Nothing is cached, every call reads the database fresh
#[derive(Debug, Clone)]
pub struct Projection {
    tag_root: String,
}

impl Projection {
    pub fn new(tag_root: &str) -> Projection {
        Projection {
            tag_root: tag_root.to_string(),
        }
    }

    pub fn get_attr(&self, path: &str) -> Result<EntryAttr, VfsError> {
        let con = open_connection();
        match self.resolve(path, &con)? {
            ResolvedPath::TopLevel => Ok(directory_attr(0)),
            ResolvedPath::TagRoot => {
                let count = tag_repository::get_tag_count(&con)
                    .map_err(|e| internal("Failed to count tags".to_string(), &e))?;
                Ok(directory_attr(count as u64))
            }
            ResolvedPath::TagDirectory { tag_ids } => {
                let count = file_repository::count_files_with_tags(&tag_ids, &con).map_err(|e| {
                    internal(format!("Failed to count files for {path}"), &e)
                })?;
                Ok(directory_attr(count as u64))
            }
            ResolvedPath::FileEntry { file_id, .. } => {
                let file = get_file(file_id, &con)?;
                Ok(symlink_attr(&file))
            }
        }
    }

    pub fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>, VfsError> {
        let con = open_connection();
        match self.resolve(path, &con)? {
            ResolvedPath::TopLevel => Ok(vec![DirEntry {
                name: self.tag_root.clone(),
                kind: EntryKind::Directory,
            }]),
            ResolvedPath::TagRoot => {
                let tags = tag_repository::get_all_tags(&con)
                    .map_err(|e| internal("Failed to retrieve all tags".to_string(), &e))?;
                Ok(tags.into_iter().map(|tag| directory_entry(tag.name)).collect())
            }
            ResolvedPath::TagDirectory { tag_ids } => {
                let tags = tag_repository::get_tags_for_tags(&tag_ids, &con).map_err(|e| {
                    internal(format!("Failed to retrieve further tags for {path}"), &e)
                })?;
                let files = file_repository::get_files_with_tags(&tag_ids, &[], &con).map_err(|e| {
                    internal(format!("Failed to retrieve files for {path}"), &e)
                })?;
                let mut entries: Vec<DirEntry> =
                    tags.into_iter().map(|tag| directory_entry(tag.name)).collect();
                entries.extend(files.iter().map(|file| DirEntry {
                    name: encode_entry_name(file.id, &file.path),
                    kind: EntryKind::Symlink,
                }));
                Ok(entries)
            }
            ResolvedPath::FileEntry { .. } => Err(VfsError::NotFound),
        }
    }

    /// the real path a file entry links to
    pub fn read_link(&self, path: &str) -> Result<String, VfsError> {
        let con = open_connection();
        match self.resolve(path, &con)? {
            ResolvedPath::FileEntry { file_id, .. } => Ok(get_file(file_id, &con)?.path),
            _ => Err(VfsError::NotFound),
        }
    }

    /// removes every tag in the path from the file entry at the end of it.
    ///
    /// The file itself is left alone, and stays tracked even if this leaves it without tags
    pub fn unlink(&self, path: &str) -> Result<(), VfsError> {
        let mut con = open_connection();
        let (tag_ids, file_id) = match self.resolve(path, &con)? {
            ResolvedPath::FileEntry { tag_ids, file_id } => (tag_ids, file_id),
            _ => {
                log::warn!("Refusing to unlink directory {path}");
                return Err(VfsError::NotPermitted);
            }
        };
        get_file(file_id, &con)?;
        let tx = con
            .transaction()
            .map_err(|e| internal(format!("Failed to start transaction to unlink {path}"), &e))?;
        for tag_id in &tag_ids {
            file_repository::remove_tag_from_file(file_id, *tag_id, &tx).map_err(|e| {
                internal(format!("Failed to remove tag {tag_id} from file {file_id}"), &e)
            })?;
        }
        tx.commit()
            .map_err(|e| internal(format!("Failed to unlink {path}"), &e))
    }

    /// every other filesystem operation. Nothing is changed
    pub fn unsupported(&self, operation: &str) -> VfsError {
        log::debug!("Rejecting unsupported operation {operation}");
        VfsError::Unsupported
    }

    /// works out what `path` points at. Every tag in the path must exist
    pub fn resolve(&self, path: &str, con: &Connection) -> Result<ResolvedPath, VfsError> {
        let segments: Vec<&str> = path.split('/').filter(|it| !it.is_empty()).collect();
        let Some((first, rest)) = segments.split_first() else {
            return Ok(ResolvedPath::TopLevel);
        };
        if *first != self.tag_root {
            return Ok(ResolvedPath::TopLevel);
        }
        let Some((last, tag_names)) = rest.split_last() else {
            return Ok(ResolvedPath::TagRoot);
        };
        let mut tag_ids: Vec<u32> = Vec::with_capacity(rest.len());
        for name in tag_names {
            tag_ids.push(self.tag_id(name, con)?);
        }
        match decode_entry_name(last) {
            Some(file_id) => Ok(ResolvedPath::FileEntry { tag_ids, file_id }),
            None => {
                tag_ids.push(self.tag_id(last, con)?);
                Ok(ResolvedPath::TagDirectory { tag_ids })
            }
        }
    }

    fn tag_id(&self, name: &str, con: &Connection) -> Result<u32, VfsError> {
        match tag_repository::get_tag_by_name(name, con) {
            Ok(Some(tag)) => Ok(tag.id),
            Ok(None) => Err(VfsError::NotFound),
            Err(e) => Err(internal(format!("Failed to retrieve tag {name}"), &e)),
        }
    }
}

fn get_file(file_id: u32, con: &Connection) -> Result<FileRecord, VfsError> {
    match file_repository::get_file(file_id, con) {
        Ok(file) => Ok(file),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(VfsError::NotFound),
        Err(e) => Err(internal(format!("Failed to retrieve file {file_id}"), &e)),
    }
}

fn internal(context: String, e: &rusqlite::Error) -> VfsError {
    VfsError::Internal(log_db_error(context, e))
}

fn directory_entry(name: String) -> DirEntry {
    DirEntry {
        name,
        kind: EntryKind::Directory,
    }
}

fn directory_attr(size: u64) -> EntryAttr {
    EntryAttr {
        kind: EntryKind::Directory,
        size,
        mtime: SystemTime::now(),
        perm: 0o755,
    }
}

/// a file that's gone from disk is still listed, just with no size and an epoch timestamp
fn symlink_attr(file: &FileRecord) -> EntryAttr {
    let (size, mtime) = match fs::metadata(&file.path) {
        Ok(metadata) => (metadata.len(), metadata.modified().unwrap_or(UNIX_EPOCH)),
        Err(_) => (0, UNIX_EPOCH),
    };
    EntryAttr {
        kind: EntryKind::Symlink,
        size,
        mtime,
        perm: 0o755,
    }
}
