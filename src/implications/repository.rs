use rusqlite::Connection;

use crate::implications::Implication;
use crate::repository::id_array;
use crate::tags::Tag;

/// adds the edge `tag_id -> implied_tag_id`. Does nothing if it already exists.
/// Checking the edge doesn't create a cycle needs to be done on the caller's end
pub fn create_implication(
    tag_id: u32,
    implied_tag_id: u32,
    con: &Connection,
) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/implications/create_implication.sql"
    ))?;
    pst.execute(rusqlite::params![tag_id, implied_tag_id])?;
    Ok(())
}

pub fn delete_implication(
    tag_id: u32,
    implied_tag_id: u32,
    con: &Connection,
) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/implications/delete_implication.sql"
    ))?;
    pst.execute(rusqlite::params![tag_id, implied_tag_id])?;
    Ok(())
}

/// removes every implication the tag is on either side of
pub fn delete_implications_for_tag(tag_id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/implications/delete_implications_for_tag.sql"
    ))?;
    pst.execute(rusqlite::params![tag_id])?;
    Ok(())
}

/// retrieves the direct implications of the passed tags. This does _not_ follow implied tags any further
pub fn get_implications_for_tags(
    tag_ids: &[u32],
    con: &Connection,
) -> Result<Vec<Implication>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/implications/get_implications_for_tags.sql"
    ))?;
    let rows = pst.query_map(rusqlite::params![id_array(tag_ids)], implication_mapper)?;
    rows.collect()
}

pub fn get_all_implications(con: &Connection) -> Result<Vec<Implication>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/implications/get_all_implications.sql"
    ))?;
    let rows = pst.query_map([], implication_mapper)?;
    rows.collect()
}

/// 1. tag id
/// 2. tag name
/// 3. implied tag id
/// 4. implied tag name
fn implication_mapper(row: &rusqlite::Row) -> Result<Implication, rusqlite::Error> {
    Ok(Implication {
        tag: Tag {
            id: row.get(0)?,
            name: row.get(1)?,
        },
        implied_tag: Tag {
            id: row.get(2)?,
            name: row.get(3)?,
        },
    })
}
