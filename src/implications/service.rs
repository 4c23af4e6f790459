use std::backtrace::Backtrace;
use std::collections::HashSet;

use itertools::Itertools;
use rusqlite::{Connection, TransactionBehavior};

use crate::implications::repository as implication_repository;
use crate::implications::Implication;
use crate::model::error::implication_errors::ImplicationError;
use crate::repository::open_connection;
use crate::tags::repository as tag_repository;
use crate::util::log_db_error;

/// retrieves every implication in the database
pub fn get_all_implications() -> Result<Vec<Implication>, ImplicationError> {
    let con = open_connection();
    implication_repository::get_all_implications(&con).map_err(|e| {
        ImplicationError::DbError(log_db_error("Failed to retrieve implications".to_string(), &e))
    })
}

/// retrieves every implication reachable from the passed tags, following implied tags transitively
pub fn implications_for_tags(tag_ids: &[u32]) -> Result<Vec<Implication>, ImplicationError> {
    let con = open_connection();
    collect_implications(tag_ids, &con).map_err(|e| {
        ImplicationError::DbError(log_db_error(
            format!("Failed to retrieve implications for tags {tag_ids:?}"),
            &e,
        ))
    })
}

/// breadth-first walk of the implication graph starting from `tag_ids`.
///
/// Edges are only visited once, so this terminates even if the graph somehow contains a cycle.
/// Implications are returned in the order they were discovered
pub fn collect_implications(
    tag_ids: &[u32],
    con: &Connection,
) -> Result<Vec<Implication>, rusqlite::Error> {
    let mut found: Vec<Implication> = Vec::new();
    let mut visited_edges: HashSet<(u32, u32)> = HashSet::new();
    let mut frontier: Vec<u32> = tag_ids.iter().copied().unique().collect();
    while !frontier.is_empty() {
        let implications = implication_repository::get_implications_for_tags(&frontier, con)?;
        let mut next_frontier: Vec<u32> = Vec::new();
        for implication in implications {
            if visited_edges.insert(implication.edge()) {
                next_frontier.push(implication.implied_tag.id);
                found.push(implication);
            }
        }
        frontier = next_frontier.into_iter().unique().collect();
    }
    Ok(found)
}

/// returns `tag_ids` plus every tag they transitively imply, without duplicates
pub fn expand_tag_ids(tag_ids: &[u32], con: &Connection) -> Result<Vec<u32>, rusqlite::Error> {
    let implied = collect_implications(tag_ids, con)?;
    Ok(tag_ids
        .iter()
        .copied()
        .chain(implied.iter().map(|it| it.implied_tag.id))
        .unique()
        .collect())
}

/// adds the implication `tag_id -> implied_tag_id`.
///
/// Fails with [`ImplicationError::CircularImplication`] if `implied_tag_id` is `tag_id` or already implies it,
/// in which case nothing is changed
pub fn add_implication(tag_id: u32, implied_tag_id: u32) -> Result<(), ImplicationError> {
    let mut con = open_connection();
    // immediate so a concurrent add can't sneak a back-edge in between our check and insert
    let tx = con
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| {
            ImplicationError::DbError(log_db_error(
                format!("Failed to start transaction to add implication {tag_id} -> {implied_tag_id}"),
                &e,
            ))
        })?;
    for id in [tag_id, implied_tag_id] {
        match tag_repository::get_tag(id, &tx) {
            Ok(_) => {}
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                log::error!(
                    "Cannot add implication {tag_id} -> {implied_tag_id} because tag {id} does not exist!\n{}",
                    Backtrace::force_capture()
                );
                return Err(ImplicationError::TagNotFound(id));
            }
            Err(e) => {
                return Err(ImplicationError::DbError(log_db_error(
                    format!("Failed to retrieve tag {id}"),
                    &e,
                )));
            }
        }
    }
    if tag_id == implied_tag_id {
        log::warn!("Refusing to make tag {tag_id} imply itself");
        return Err(ImplicationError::CircularImplication);
    }
    let existing = collect_implications(&[implied_tag_id], &tx).map_err(|e| {
        ImplicationError::DbError(log_db_error(
            format!("Failed to retrieve implications for tag {implied_tag_id}"),
            &e,
        ))
    })?;
    if existing.iter().any(|it| it.implied_tag.id == tag_id) {
        log::warn!(
            "Refusing to add implication {tag_id} -> {implied_tag_id}, tag {implied_tag_id} already implies {tag_id}"
        );
        return Err(ImplicationError::CircularImplication);
    }
    implication_repository::create_implication(tag_id, implied_tag_id, &tx)
        .and_then(|_| tx.commit())
        .map_err(|e| {
            ImplicationError::DbError(log_db_error(
                format!("Failed to add implication {tag_id} -> {implied_tag_id}"),
                &e,
            ))
        })
}

/// removes the implication `tag_id -> implied_tag_id`. Does nothing if it doesn't exist
pub fn remove_implication(tag_id: u32, implied_tag_id: u32) -> Result<(), ImplicationError> {
    let con = open_connection();
    implication_repository::delete_implication(tag_id, implied_tag_id, &con).map_err(|e| {
        ImplicationError::DbError(log_db_error(
            format!("Failed to remove implication {tag_id} -> {implied_tag_id}"),
            &e,
        ))
    })
}

/// removes every implication the tag is on either side of
pub fn remove_implications_for_tag(tag_id: u32) -> Result<(), ImplicationError> {
    let con = open_connection();
    implication_repository::delete_implications_for_tag(tag_id, &con).map_err(|e| {
        ImplicationError::DbError(log_db_error(
            format!("Failed to remove implications for tag {tag_id}"),
            &e,
        ))
    })
}
