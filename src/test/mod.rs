use std::fs;
use std::fs::{remove_dir_all, remove_file};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::files::repository as file_repository;
use crate::files::FileMetadata;
use crate::implications::repository as implication_repository;
use crate::repository::{initialize_db, open_connection};
use crate::tags::repository as tag_repository;

/// each test thread gets its own database file named after the thread, so tests can run in parallel
pub fn init_db_folder() {
    let thread_name = current_thread_name();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
    initialize_db().unwrap();
}

pub fn current_thread_name() -> String {
    let current_thread = std::thread::current();
    current_thread.name().unwrap().to_string()
}

/// a scratch directory on disk for this test thread. Created if it doesn't exist yet
pub fn test_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tag_fs_{}", current_thread_name()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// writes a file into [`test_dir`] and returns its absolute path
pub fn create_file_disk(file_name: &str, contents: &str) -> String {
    let path = test_dir().join(file_name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().to_string()
}

/// creates a directory in [`test_dir`] and returns its absolute path
pub fn create_folder_disk(folder_name: &str) -> String {
    let path = test_dir().join(folder_name);
    fs::create_dir_all(&path).unwrap();
    path.to_string_lossy().to_string()
}

pub fn create_tag_db_entry(name: &str) -> u32 {
    let connection = open_connection();
    let id = tag_repository::create_tag(name, &connection).unwrap().id;
    connection.close().unwrap();
    id
}

/// tracks `path` without looking at the disk
pub fn create_file_db_entry(path: &str, is_dir: bool) -> u32 {
    let connection = open_connection();
    let id = file_repository::create_file(
        &FileMetadata {
            path: path.to_string(),
            fingerprint: String::new(),
            mod_time: DateTime::<Utc>::from(std::time::UNIX_EPOCH),
            size: 0,
            is_dir,
        },
        &connection,
    )
    .unwrap()
    .id;
    connection.close().unwrap();
    id
}

pub fn tag_file_db_entry(file_id: u32, tag_id: u32) {
    let connection = open_connection();
    file_repository::add_tag_to_file(file_id, tag_id, &connection).unwrap();
    connection.close().unwrap();
}

pub fn create_implication_db_entry(tag_id: u32, implied_tag_id: u32) {
    let connection = open_connection();
    implication_repository::create_implication(tag_id, implied_tag_id, &connection).unwrap();
    connection.close().unwrap();
}

pub fn cleanup() {
    let thread_name = current_thread_name();
    remove_file(Path::new(format!("{thread_name}.sqlite").as_str())).unwrap_or(());
    let dir = std::env::temp_dir().join(format!("tag_fs_{thread_name}"));
    remove_dir_all(dir).unwrap_or(());
}
