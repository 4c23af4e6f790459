use rocket::serde::json::Json;

use crate::model::error::tag_errors::{
    CopyTagError, CreateTagError, DeleteTagError, GetTagError, UpdateTagError,
};
use crate::model::response::tag_responses::{
    CreateTagResponse, DeleteTagResponse, GetTagResponse, GetTagsResponse, UpdateTagResponse,
};
use crate::model::response::{BasicMessage, TagApi};
use crate::tags::service;

/// every tag, or with `name` just the tag with that name
#[get("/?<name>")]
pub fn get_all_tags(name: Option<&str>) -> GetTagsResponse {
    let tags = match name {
        Some(name) => service::get_tag_by_name(name).map(|tag| vec![tag]),
        None => service::get_all_tags(),
    };
    match tags {
        Ok(tags) => GetTagsResponse::Success(Json::from(
            tags.into_iter().map(TagApi::from).collect::<Vec<TagApi>>(),
        )),
        Err(GetTagError::TagNotFound) => {
            GetTagsResponse::TagNotFound(BasicMessage::new("No tag with that name was found."))
        }
        Err(GetTagError::DbError(_)) => GetTagsResponse::TagDbError(BasicMessage::new(
            "Failed to pull tags from database. Check server logs for details",
        )),
    }
}

#[get("/<id>")]
pub fn get_tag(id: u32) -> GetTagResponse {
    match service::get_tag(id) {
        Ok(tag) => GetTagResponse::Success(Json::from(TagApi::from(tag))),
        Err(GetTagError::TagNotFound) => GetTagResponse::TagNotFound(BasicMessage::new(
            "The tag with the passed id could not be found.",
        )),
        Err(_) => GetTagResponse::TagDbError(BasicMessage::new(
            "Failed to pull tag info from database. Check server logs for details",
        )),
    }
}

/// the tags that share at least one file with the tag
#[get("/<id>/related")]
pub fn get_related_tags(id: u32) -> GetTagsResponse {
    if let Err(e) = service::get_tag(id) {
        return match e {
            GetTagError::TagNotFound => GetTagsResponse::TagNotFound(BasicMessage::new(
                "The tag with the passed id could not be found.",
            )),
            GetTagError::DbError(_) => GetTagsResponse::TagDbError(BasicMessage::new(
                "Failed to pull tag info from database. Check server logs for details",
            )),
        };
    }
    match service::tags_for_tags(&[id]) {
        Ok(tags) => GetTagsResponse::Success(Json::from(
            tags.into_iter().map(TagApi::from).collect::<Vec<TagApi>>(),
        )),
        Err(_) => GetTagsResponse::TagDbError(BasicMessage::new(
            "Failed to pull related tags from database. Check server logs for details",
        )),
    }
}

#[post("/", data = "<tag>")]
pub fn create_tag(tag: Json<TagApi>) -> CreateTagResponse {
    match service::create_tag(&tag.name) {
        Ok(tag) => CreateTagResponse::Success(Json::from(TagApi::from(tag))),
        Err(CreateTagError::InvalidName(reason)) => {
            CreateTagResponse::InvalidName(Json::from(BasicMessage::from(reason)))
        }
        Err(CreateTagError::AlreadyExists) => CreateTagResponse::TagAlreadyExists(
            BasicMessage::new("A tag with that name already exists."),
        ),
        Err(CreateTagError::DbError(_)) => CreateTagResponse::TagDbError(BasicMessage::new(
            "Failed to create tag info in database. Check server logs for details",
        )),
    }
}

/// renames the tag with the id in the body
#[put("/", data = "<tag>")]
pub fn update_tag(tag: Json<TagApi>) -> UpdateTagResponse {
    let Some(id) = tag.id else {
        return UpdateTagResponse::BadRequest(BasicMessage::new(
            "The id of the tag to rename is required.",
        ));
    };
    match service::rename_tag(id, &tag.name) {
        Ok(tag) => UpdateTagResponse::Success(Json::from(TagApi::from(tag))),
        Err(UpdateTagError::TagNotFound) => {
            UpdateTagResponse::TagNotFound(BasicMessage::new("No tag with that id was found."))
        }
        Err(UpdateTagError::NewNameAlreadyExists) => UpdateTagResponse::TagAlreadyExists(
            BasicMessage::new("A tag with that name already exists."),
        ),
        Err(UpdateTagError::InvalidName(reason)) => {
            UpdateTagResponse::BadRequest(Json::from(BasicMessage::from(reason)))
        }
        Err(UpdateTagError::DbError(_)) => UpdateTagResponse::TagDbError(BasicMessage::new(
            "Failed to update tag in database. Check server logs for details",
        )),
    }
}

/// creates a new tag with the name in the body, on every file the tag with `id` is on
#[post("/<id>/copy", data = "<tag>")]
pub fn copy_tag(id: u32, tag: Json<TagApi>) -> UpdateTagResponse {
    match service::copy_tag(id, &tag.name) {
        Ok(tag) => UpdateTagResponse::Success(Json::from(TagApi::from(tag))),
        Err(CopyTagError::TagNotFound) => {
            UpdateTagResponse::TagNotFound(BasicMessage::new("No tag with that id was found."))
        }
        Err(CopyTagError::NewNameAlreadyExists) => UpdateTagResponse::TagAlreadyExists(
            BasicMessage::new("A tag with that name already exists."),
        ),
        Err(CopyTagError::InvalidName(reason)) => {
            UpdateTagResponse::BadRequest(Json::from(BasicMessage::from(reason)))
        }
        Err(CopyTagError::DbError(_)) => UpdateTagResponse::TagDbError(BasicMessage::new(
            "Failed to copy tag in database. Check server logs for details",
        )),
    }
}

#[delete("/<id>")]
pub fn delete_tag(id: u32) -> DeleteTagResponse {
    delete_response(service::delete_tag(id))
}

/// deletes each tag in `id` in order. Tags before the first one that fails stay deleted
#[delete("/?<id>")]
pub fn delete_tags(id: Vec<u32>) -> DeleteTagResponse {
    delete_response(service::delete_tags(&id))
}

fn delete_response(res: Result<(), DeleteTagError>) -> DeleteTagResponse {
    match res {
        Ok(()) => DeleteTagResponse::Success(()),
        Err(DeleteTagError::TagNotFound) => {
            DeleteTagResponse::TagNotFound(BasicMessage::new("No tag with that id was found."))
        }
        Err(DeleteTagError::DbError(_)) => DeleteTagResponse::TagDbError(BasicMessage::new(
            "Failed to delete tag from database. Check server logs for details.",
        )),
    }
}
