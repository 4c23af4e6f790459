use std::backtrace::Backtrace;

use itertools::Itertools;
use rusqlite::Connection;

use crate::files::{FileMetadata, FileRecord};
use crate::repository::id_array;

/// starts tracking a file. The caller must make sure no file with that path is tracked already
pub fn create_file(file: &FileMetadata, con: &Connection) -> Result<FileRecord, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/files/create_file.sql"))?;
    let id = pst.insert(rusqlite::params![
        file.path,
        file.fingerprint,
        file.mod_time,
        file.size as i64,
        file.is_dir
    ])? as u32;
    Ok(FileRecord {
        id,
        path: file.path.clone(),
        fingerprint: file.fingerprint.clone(),
        mod_time: file.mod_time,
        size: file.size,
        is_dir: file.is_dir,
    })
}

/// retrieves the file with the passed id. Returns [`rusqlite::Error::QueryReturnedNoRows`] if it isn't tracked
pub fn get_file(id: u32, con: &Connection) -> Result<FileRecord, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/files/get_by_id.sql"))?;
    pst.query_row(rusqlite::params![id], file_mapper)
}

/// if `None` is returned, the path isn't tracked
pub fn get_file_by_path(path: &str, con: &Connection) -> Result<Option<FileRecord>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/files/get_by_path.sql"))?;
    match pst.query_row(rusqlite::params![path], file_mapper) {
        Ok(file) => Ok(Some(file)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => {
            log::error!(
                "Failed to get file by path {path}, error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(e)
        }
    }
}

pub fn get_all_files(con: &Connection) -> Result<Vec<FileRecord>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/files/get_all_files.sql"))?;
    let rows = pst.query_map([], file_mapper)?;
    rows.collect()
}

/// retrieves every tracked file below the directory `path`, not including `path` itself
pub fn get_files_under_path(path: &str, con: &Connection) -> Result<Vec<FileRecord>, rusqlite::Error> {
    let prefix = format!("{}/", path.trim_end_matches('/'));
    let mut pst = con.prepare(include_str!(
        "../assets/queries/files/get_files_under_path.sql"
    ))?;
    let rows = pst.query_map(rusqlite::params![prefix], file_mapper)?;
    rows.collect()
}

/// replaces everything stored about the file with `id`, including its path
pub fn update_file(id: u32, file: &FileMetadata, con: &Connection) -> Result<FileRecord, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/files/update_file.sql"))?;
    pst.execute(rusqlite::params![
        id,
        file.path,
        file.fingerprint,
        file.mod_time,
        file.size as i64,
        file.is_dir
    ])?;
    Ok(FileRecord {
        id,
        path: file.path.clone(),
        fingerprint: file.fingerprint.clone(),
        mod_time: file.mod_time,
        size: file.size,
        is_dir: file.is_dir,
    })
}

/// retrieves the files that have every tag in `include` and none of the tags in `exclude`.
///
/// With an empty `include`, every file without an `exclude` tag is returned
pub fn get_files_with_tags(
    include: &[u32],
    exclude: &[u32],
    con: &Connection,
) -> Result<Vec<FileRecord>, rusqlite::Error> {
    if include.is_empty() {
        let mut pst = con.prepare(include_str!(
            "../assets/queries/files/get_files_without_tags.sql"
        ))?;
        let rows = pst.query_map(rusqlite::params![id_array(exclude)], file_mapper)?;
        return rows.collect();
    }
    let include: Vec<u32> = include.iter().copied().unique().collect();
    let mut pst = con.prepare(include_str!(
        "../assets/queries/files/get_files_with_tags.sql"
    ))?;
    let rows = pst.query_map(
        rusqlite::params![id_array(&include), include.len() as i64, id_array(exclude)],
        file_mapper,
    )?;
    rows.collect()
}

/// counts the files that have every tag in `include`
pub fn count_files_with_tags(include: &[u32], con: &Connection) -> Result<u32, rusqlite::Error> {
    let include: Vec<u32> = include.iter().copied().unique().collect();
    con.query_row(
        include_str!("../assets/queries/files/count_files_with_tags.sql"),
        rusqlite::params![id_array(&include), include.len() as i64],
        |row| row.get(0),
    )
}

/// removes the file row. Its file tags must be removed first
pub fn delete_file(id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/files/delete_file.sql"))?;
    pst.execute(rusqlite::params![id])?;
    Ok(())
}

/// adds the tag to the file. Does nothing if the file already has that tag
pub fn add_tag_to_file(file_id: u32, tag_id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/files/add_tag_to_file.sql"))?;
    pst.execute(rusqlite::params![file_id, tag_id])?;
    Ok(())
}

pub fn remove_tag_from_file(
    file_id: u32,
    tag_id: u32,
    con: &Connection,
) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/files/remove_tag_from_file.sql"
    ))?;
    pst.execute(rusqlite::params![file_id, tag_id])?;
    Ok(())
}

/// removes every tag from the file
pub fn remove_tags_from_file(file_id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/files/remove_tags_from_file.sql"
    ))?;
    pst.execute(rusqlite::params![file_id])?;
    Ok(())
}

/// removes the tag from every file
pub fn remove_file_tags_for_tag(tag_id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/files/remove_file_tags_for_tag.sql"
    ))?;
    pst.execute(rusqlite::params![tag_id])?;
    Ok(())
}

/// retrieves the ids of every file that has the passed tag
pub fn get_file_ids_for_tag(tag_id: u32, con: &Connection) -> Result<Vec<u32>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/files/get_file_ids_for_tag.sql"
    ))?;
    let rows = pst.query_map(rusqlite::params![tag_id], |row| row.get(0))?;
    rows.collect()
}

/// how many tags the file has
pub fn get_tag_count_for_file(file_id: u32, con: &Connection) -> Result<u32, rusqlite::Error> {
    con.query_row(
        include_str!("../assets/queries/files/get_tag_count_for_file.sql"),
        rusqlite::params![file_id],
        |row| row.get(0),
    )
}

/// 1. id
/// 2. path
/// 3. fingerprint
/// 4. mod_time
/// 5. size
/// 6. is_dir
fn file_mapper(row: &rusqlite::Row) -> Result<FileRecord, rusqlite::Error> {
    let size: i64 = row.get(4)?;
    Ok(FileRecord {
        id: row.get(0)?,
        path: row.get(1)?,
        fingerprint: row.get(2)?,
        mod_time: row.get(3)?,
        size: size as u64,
        is_dir: row.get(5)?,
    })
}
