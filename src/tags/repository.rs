use std::backtrace::Backtrace;

use itertools::Itertools;
use rusqlite::Connection;

use crate::repository::{id_array, text_array};
use crate::tags::Tag;

/// creates a new tag in the database. This does not check if the tag already exists,
/// so the caller must check that themselves
pub fn create_tag(name: &str, con: &Connection) -> Result<Tag, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/create_tag.sql"))?;
    let id = pst.insert(rusqlite::params![name])? as u32;
    Ok(Tag {
        id,
        name: name.to_string(),
    })
}

/// searches for a tag that exactly matches the passed name.
///
/// if `None` is returned, that means there was no match
pub fn get_tag_by_name(name: &str, con: &Connection) -> Result<Option<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_by_name.sql"))?;
    match pst.query_row(rusqlite::params![name], tag_mapper) {
        Ok(tag) => Ok(Some(tag)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => {
            log::error!(
                "Failed to get tag by name {name}, error is {e:?}\n{}",
                Backtrace::force_capture()
            );
            Err(e)
        }
    }
}

/// retrieves every tag whose name is in `names`. Names without a tag are silently skipped,
/// so callers that care need to compare the result against what they asked for
pub fn get_tags_by_names(names: &[String], con: &Connection) -> Result<Vec<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_by_names.sql"))?;
    let rows = pst.query_map(rusqlite::params![text_array(names)], tag_mapper)?;
    rows.collect()
}

/// retrieves a tag from the database with the passed `id`
///
/// # Parameters
/// - `id`: the unique identifier of the tag to retrieve
/// - `con`: the database connection to use. Callers must handle closing the connection
///
/// # Returns
/// - `Ok(Tag)`: the tag with the specified ID if the tag exists
/// - `Err(rusqlite::Error)`: if there was an error during the database operation, including if no tag with the specified ID exists
pub fn get_tag(id: u32, con: &Connection) -> Result<Tag, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_by_id.sql"))?;
    pst.query_row(rusqlite::params![id], tag_mapper)
}

pub fn get_all_tags(con: &Connection) -> Result<Vec<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_all_tags.sql"))?;
    let rows = pst.query_map([], tag_mapper)?;
    rows.collect()
}

pub fn get_tag_count(con: &Connection) -> Result<u32, rusqlite::Error> {
    con.query_row(
        include_str!("../assets/queries/tags/get_tag_count.sql"),
        [],
        |row| row.get(0),
    )
}

/// renames the passed tag. Checking to make sure the tag exists and the name is free needs to be done on the caller's end
pub fn update_tag(tag: &Tag, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/update_tag.sql"))?;
    pst.execute(rusqlite::params![tag.name, tag.id])?;
    Ok(())
}

/// deletes just the tag row. File tags and implications referencing it must be removed first
pub fn delete_tag(id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/delete_tag.sql"))?;
    pst.execute(rusqlite::params![id])?;
    Ok(())
}

pub fn get_tags_for_file(file_id: u32, con: &Connection) -> Result<Vec<Tag>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_tags_for_file.sql"))?;
    let rows = pst.query_map(rusqlite::params![file_id], tag_mapper)?;
    rows.collect()
}

/// retrieves the tags, other than `tag_ids`, that appear on at least one file carrying every tag in `tag_ids`.
///
/// With no `tag_ids`, every tag that is on at least one file is returned
pub fn get_tags_for_tags(tag_ids: &[u32], con: &Connection) -> Result<Vec<Tag>, rusqlite::Error> {
    if tag_ids.is_empty() {
        let mut pst = con.prepare(include_str!(
            "../assets/queries/tags/get_tags_on_any_file.sql"
        ))?;
        let rows = pst.query_map([], tag_mapper)?;
        return rows.collect();
    }
    let tag_ids: Vec<u32> = tag_ids.iter().copied().unique().collect();
    let mut pst = con.prepare(include_str!("../assets/queries/tags/get_tags_for_tags.sql"))?;
    let rows = pst.query_map(
        rusqlite::params![id_array(&tag_ids), tag_ids.len() as i64],
        tag_mapper,
    )?;
    rows.collect()
}

/// adds every file tagged with `source_id` to `dest_id`
pub fn copy_file_tags(source_id: u32, dest_id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/tags/copy_file_tags.sql"))?;
    pst.execute(rusqlite::params![source_id, dest_id])?;
    Ok(())
}

/// maps a [`Tag`] from a database row
/// 1. id
/// 2. name
fn tag_mapper(row: &rusqlite::Row) -> Result<Tag, rusqlite::Error> {
    let id: u32 = row.get(0)?;
    let name: String = row.get(1)?;
    Ok(Tag { id, name })
}
