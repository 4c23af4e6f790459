use std::backtrace::Backtrace;

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;

use crate::files::repository as file_repository;
use crate::files::FileRecord;
use crate::implications::repository as implication_repository;
use crate::implications::service::expand_tag_ids;
use crate::implications::Implication;
use crate::model::error::file_errors::{GetFileError, TagRelationError};
use crate::model::error::tag_errors::{
    CopyTagError, CreateTagError, DeleteTagError, GetTagError, UpdateTagError,
};
use crate::repository::open_connection;
use crate::tags::repository as tag_repository;
use crate::tags::Tag;
use crate::util::{is_unique_violation, log_db_error};

static BANNED_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new("[,= /]").unwrap());

/// checks the name against the tag naming rules, returning the reason if it breaks one
pub fn validate_tag_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Tag names cannot be empty.".to_string());
    }
    if name == "." || name == ".." {
        return Err("Tag names cannot be '.' or '..'.".to_string());
    }
    if name.starts_with('-') {
        return Err("Tag names cannot start with '-'.".to_string());
    }
    if let Some(found) = BANNED_CHARS.find(name) {
        return Err(format!("Tag names cannot contain '{}'.", found.as_str()));
    }
    Ok(())
}

/// creates a tag with the passed name. Fails if the name is invalid or already taken
pub fn create_tag(name: &str) -> Result<Tag, CreateTagError> {
    if let Err(reason) = validate_tag_name(name) {
        log::warn!("Refusing to create tag with invalid name {name:?}: {reason}");
        return Err(CreateTagError::InvalidName(reason));
    }
    let con = open_connection();
    match tag_repository::get_tag_by_name(name, &con) {
        Ok(None) => {}
        Ok(Some(_)) => {
            log::warn!("Cannot create tag {name} because it already exists");
            return Err(CreateTagError::AlreadyExists);
        }
        Err(e) => {
            return Err(CreateTagError::DbError(log_db_error(
                format!("Failed to check if a tag with the name {name} already exists"),
                &e,
            )));
        }
    };
    // another connection can take the name between the check and the insert
    tag_repository::create_tag(name, &con).map_err(|e| {
        if is_unique_violation(&e) {
            log::warn!("Cannot create tag {name} because it already exists");
            return CreateTagError::AlreadyExists;
        }
        CreateTagError::DbError(log_db_error(
            format!("Failed to create a new tag with the name {name}"),
            &e,
        ))
    })
}

/// will return the tag with the passed id
pub fn get_tag(id: u32) -> Result<Tag, GetTagError> {
    let con = open_connection();
    match tag_repository::get_tag(id, &con) {
        Ok(tag) => Ok(tag),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            log::error!("No tag with id {id} exists!\n{}", Backtrace::force_capture());
            Err(GetTagError::TagNotFound)
        }
        Err(e) => Err(GetTagError::DbError(log_db_error(
            format!("Could not retrieve tag with id {id}"),
            &e,
        ))),
    }
}

pub fn get_tag_by_name(name: &str) -> Result<Tag, GetTagError> {
    let con = open_connection();
    match tag_repository::get_tag_by_name(name, &con) {
        Ok(Some(tag)) => Ok(tag),
        Ok(None) => Err(GetTagError::TagNotFound),
        Err(e) => Err(GetTagError::DbError(log_db_error(
            format!("Could not retrieve tag with name {name}"),
            &e,
        ))),
    }
}

pub fn get_all_tags() -> Result<Vec<Tag>, GetTagError> {
    let con = open_connection();
    tag_repository::get_all_tags(&con)
        .map_err(|e| GetTagError::DbError(log_db_error("Failed to retrieve all tags".to_string(), &e)))
}

/// resolves every name to its tag, in the same order as `names`.
/// Fails on the first name that has no tag
pub(crate) fn resolve_tag_names(
    names: &[String],
    con: &Connection,
) -> Result<Vec<Tag>, TagRelationError> {
    let found = tag_repository::get_tags_by_names(names, con).map_err(|e| {
        TagRelationError::DbError(log_db_error(
            format!("Failed to retrieve tags with names {names:?}"),
            &e,
        ))
    })?;
    let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
    for name in names {
        match found.iter().find(|tag| &tag.name == name) {
            Some(tag) => tags.push(tag.clone()),
            None => {
                log::error!("No tag named {name} exists!\n{}", Backtrace::force_capture());
                return Err(TagRelationError::TagNotFound(name.clone()));
            }
        }
    }
    Ok(tags)
}

/// renames the tag with the passed id. The id and every file the tag is on stay the same
pub fn rename_tag(id: u32, new_name: &str) -> Result<Tag, UpdateTagError> {
    if let Err(reason) = validate_tag_name(new_name) {
        log::warn!("Refusing to rename tag {id} to invalid name {new_name:?}: {reason}");
        return Err(UpdateTagError::InvalidName(reason));
    }
    let con = open_connection();
    if let Err(e) = tag_repository::get_tag(id, &con) {
        return Err(match e {
            rusqlite::Error::QueryReturnedNoRows => {
                log::error!(
                    "Could not rename tag with id {id}, because it does not exist!\n{}",
                    Backtrace::force_capture()
                );
                UpdateTagError::TagNotFound
            }
            e => UpdateTagError::DbError(log_db_error(
                format!("Could not retrieve tag with id {id}"),
                &e,
            )),
        });
    }
    match tag_repository::get_tag_by_name(new_name, &con) {
        Ok(Some(existing)) if existing.id != id => {
            log::error!(
                "Could not rename tag with id {id} to {new_name}, because a tag with that name already exists!\n{}",
                Backtrace::force_capture()
            );
            return Err(UpdateTagError::NewNameAlreadyExists);
        }
        Ok(_) => {}
        Err(e) => {
            return Err(UpdateTagError::DbError(log_db_error(
                format!("Could not search tags by name with value {new_name}"),
                &e,
            )));
        }
    };
    let tag = Tag {
        id,
        name: new_name.to_string(),
    };
    tag_repository::update_tag(&tag, &con).map_err(|e| {
        if is_unique_violation(&e) {
            log::warn!("Could not rename tag with id {id} to {new_name}, because the name was just taken");
            return UpdateTagError::NewNameAlreadyExists;
        }
        UpdateTagError::DbError(log_db_error(
            format!("Could not rename tag with id {id} to {new_name}"),
            &e,
        ))
    })?;
    Ok(tag)
}

/// creates a new tag named `new_name` that is on every file `source_id` is on
pub fn copy_tag(source_id: u32, new_name: &str) -> Result<Tag, CopyTagError> {
    if let Err(reason) = validate_tag_name(new_name) {
        log::warn!("Refusing to copy tag {source_id} to invalid name {new_name:?}: {reason}");
        return Err(CopyTagError::InvalidName(reason));
    }
    let mut con = open_connection();
    let tx = con.transaction().map_err(|e| {
        CopyTagError::DbError(log_db_error(
            format!("Failed to start transaction to copy tag {source_id}"),
            &e,
        ))
    })?;
    if let Err(e) = tag_repository::get_tag(source_id, &tx) {
        return Err(match e {
            rusqlite::Error::QueryReturnedNoRows => {
                log::error!(
                    "Could not copy tag with id {source_id}, because it does not exist!\n{}",
                    Backtrace::force_capture()
                );
                CopyTagError::TagNotFound
            }
            e => CopyTagError::DbError(log_db_error(
                format!("Could not retrieve tag with id {source_id}"),
                &e,
            )),
        });
    }
    match tag_repository::get_tag_by_name(new_name, &tx) {
        Ok(None) => {}
        Ok(Some(_)) => {
            log::error!(
                "Could not copy tag with id {source_id} to {new_name}, because a tag with that name already exists!\n{}",
                Backtrace::force_capture()
            );
            return Err(CopyTagError::NewNameAlreadyExists);
        }
        Err(e) => {
            return Err(CopyTagError::DbError(log_db_error(
                format!("Could not search tags by name with value {new_name}"),
                &e,
            )));
        }
    };
    let copy = tag_repository::create_tag(new_name, &tx)
        .and_then(|copy| tag_repository::copy_file_tags(source_id, copy.id, &tx).map(|_| copy))
        .and_then(|copy| tx.commit().map(|_| copy))
        .map_err(|e| {
            if is_unique_violation(&e) {
                log::warn!("Could not copy tag {source_id} to {new_name}, because the name was just taken");
                return CopyTagError::NewNameAlreadyExists;
            }
            CopyTagError::DbError(log_db_error(
                format!("Failed to copy tag {source_id} to {new_name}"),
                &e,
            ))
        })?;
    Ok(copy)
}

/// deletes the tag, removing it from every file and every implication it's part of.
/// Files left without any tags stop being tracked. Either all of that happens or none of it does
pub fn delete_tag(id: u32) -> Result<(), DeleteTagError> {
    let mut con = open_connection();
    let tx = con.transaction().map_err(|e| {
        DeleteTagError::DbError(log_db_error(
            format!("Failed to start transaction to delete tag {id}"),
            &e,
        ))
    })?;
    if let Err(e) = tag_repository::get_tag(id, &tx) {
        return Err(match e {
            rusqlite::Error::QueryReturnedNoRows => {
                log::error!(
                    "Could not delete tag with id {id}, because it does not exist!\n{}",
                    Backtrace::force_capture()
                );
                DeleteTagError::TagNotFound
            }
            e => DeleteTagError::DbError(log_db_error(
                format!("Could not retrieve tag with id {id}"),
                &e,
            )),
        });
    }
    delete_tag_cascade(id, &tx)
        .and_then(|_| tx.commit())
        .map_err(|e| DeleteTagError::DbError(log_db_error(format!("Failed to delete tag {id}"), &e)))
}

fn delete_tag_cascade(id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let file_ids = file_repository::get_file_ids_for_tag(id, con)?;
    file_repository::remove_file_tags_for_tag(id, con)?;
    implication_repository::delete_implications_for_tag(id, con)?;
    tag_repository::delete_tag(id, con)?;
    for file_id in file_ids {
        if file_repository::get_tag_count_for_file(file_id, con)? == 0 {
            log::debug!("Pruning file {file_id} since it no longer has any tags");
            file_repository::delete_file(file_id, con)?;
        }
    }
    Ok(())
}

/// deletes each tag in order, stopping at the first one that fails
pub fn delete_tags(ids: &[u32]) -> Result<(), DeleteTagError> {
    for id in ids {
        delete_tag(*id)?;
    }
    Ok(())
}

/// retrieves the files that have every tag in `include` and none in `exclude`. Implications are not followed.
///
/// An empty `include` matches every file without an `exclude` tag
pub fn files_with_tags(include: &[u32], exclude: &[u32]) -> Result<Vec<FileRecord>, GetFileError> {
    let con = open_connection();
    file_repository::get_files_with_tags(include, exclude, &con).map_err(|e| {
        GetFileError::DbError(log_db_error(
            format!("Failed to retrieve files with tags {include:?} and without tags {exclude:?}"),
            &e,
        ))
    })
}

/// same as [`files_with_tags`], except a file also counts as having a tag if it has any tag that implies it
pub fn files_with_tags_implied(
    include: &[u32],
    exclude: &[u32],
) -> Result<Vec<FileRecord>, GetFileError> {
    let con = open_connection();
    files_with_tags_implied_on(include, exclude, &con).map_err(|e| {
        GetFileError::DbError(log_db_error(
            format!("Failed to retrieve files implied by tags {include:?} and without tags {exclude:?}"),
            &e,
        ))
    })
}

/// each included tag matches a file if the file has the tag, or has any tag that implies it
fn files_with_tags_implied_on(
    include: &[u32],
    exclude: &[u32],
    con: &Connection,
) -> Result<Vec<FileRecord>, rusqlite::Error> {
    if include.is_empty() {
        return file_repository::get_files_with_tags(&[], exclude, con);
    }
    let implications = implication_repository::get_all_implications(con)?;
    let mut matches: Option<Vec<FileRecord>> = None;
    for tag_id in include {
        let mut files: Vec<FileRecord> = Vec::new();
        for implying_id in implying_tags(*tag_id, &implications) {
            for file in file_repository::get_files_with_tags(&[implying_id], exclude, con)? {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }
        matches = Some(match matches {
            None => files,
            Some(current) => current.into_iter().filter(|it| files.contains(it)).collect(),
        });
    }
    let mut files = matches.unwrap_or_default();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// every tag that implies `tag_id`, directly or through other tags, plus `tag_id` itself
fn implying_tags(tag_id: u32, implications: &[Implication]) -> Vec<u32> {
    let mut found = vec![tag_id];
    let mut index = 0;
    while index < found.len() {
        let current = found[index];
        for implication in implications.iter().filter(|it| it.implied_tag.id == current) {
            if !found.contains(&implication.tag.id) {
                found.push(implication.tag.id);
            }
        }
        index += 1;
    }
    found
}

/// retrieves the tags, other than `tag_ids`, that are on at least one file carrying every tag in `tag_ids`
pub fn tags_for_tags(tag_ids: &[u32]) -> Result<Vec<Tag>, GetTagError> {
    let con = open_connection();
    tag_repository::get_tags_for_tags(tag_ids, &con).map_err(|e| {
        GetTagError::DbError(log_db_error(
            format!("Failed to retrieve tags related to {tag_ids:?}"),
            &e,
        ))
    })
}

pub fn tags_for_file(file_id: u32) -> Result<Vec<Tag>, GetTagError> {
    let con = open_connection();
    tag_repository::get_tags_for_file(file_id, &con).map_err(|e| {
        GetTagError::DbError(log_db_error(
            format!("Failed to retrieve tags for file {file_id}"),
            &e,
        ))
    })
}

/// the tags on the file plus every tag they imply, ordered by name
pub fn tags_for_file_implied(file_id: u32) -> Result<Vec<Tag>, GetTagError> {
    let con = open_connection();
    let explicit = tag_repository::get_tags_for_file(file_id, &con);
    let explicit_ids: Result<Vec<u32>, rusqlite::Error> =
        explicit.map(|tags| tags.iter().map(|it| it.id).collect());
    explicit_ids
        .and_then(|ids| expand_tag_ids(&ids, &con))
        .and_then(|ids| {
            ids.iter()
                .map(|id| tag_repository::get_tag(*id, &con))
                .collect::<Result<Vec<Tag>, rusqlite::Error>>()
        })
        .map(|mut tags| {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            tags
        })
        .map_err(|e| {
            GetTagError::DbError(log_db_error(
                format!("Failed to retrieve implied tags for file {file_id}"),
                &e,
            ))
        })
}

/// retrieves the tags on the file at `path`. An untracked path has no tags
pub fn tags_for_path(path: &str) -> Result<Vec<Tag>, GetTagError> {
    let con = open_connection();
    let file = file_repository::get_file_by_path(path, &con).map_err(|e| {
        GetTagError::DbError(log_db_error(format!("Failed to retrieve file {path}"), &e))
    })?;
    match file {
        Some(file) => tag_repository::get_tags_for_file(file.id, &con).map_err(|e| {
            GetTagError::DbError(log_db_error(
                format!("Failed to retrieve tags for file {path}"),
                &e,
            ))
        }),
        None => Ok(Vec::new()),
    }
}
