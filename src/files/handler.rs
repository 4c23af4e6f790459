use rocket::serde::json::Json;

use crate::files::service;
use crate::model::error::file_errors::{GetFileError, TagRelationError};
use crate::model::error::tag_errors::GetTagError;
use crate::model::request::{FileQueryApi, RepairRequest, TagFileRequest, UntagFileRequest};
use crate::model::response::file_responses::{
    GetFileResponse, GetFileTagsResponse, ListFilesResponse, RepairResponse, StatusResponse,
    TagFileResponse, UntagFileResponse,
};
use crate::model::response::{BasicMessage, FileApi, RepairRowApi, StatusRowApi, TagApi};
use crate::tags::service as tag_service;

#[get("/?<query..>")]
pub fn list_files(query: FileQueryApi) -> ListFilesResponse {
    match service::list_files(&query.into()) {
        Ok(paths) => ListFilesResponse::Success(Json::from(paths)),
        Err(TagRelationError::TagNotFound(name)) => ListFilesResponse::TagNotFound(Json::from(
            BasicMessage::from(format!("No tag named {name} exists.")),
        )),
        Err(_) => ListFilesResponse::Failure(BasicMessage::new(
            "Failed to list files. Check server logs for details",
        )),
    }
}

/// how tracked files compare to what's on disk. Without `path`, every tracked file is checked.
/// `directory` leaves out the contents of directories passed as `path`
#[get("/status?<path>&<directory>")]
pub fn get_status(path: Vec<String>, directory: bool) -> StatusResponse {
    let report = if path.is_empty() {
        service::status()
    } else {
        service::status_paths(&path, directory)
    };
    match report {
        Ok(report) => StatusResponse::Success(Json::from(
            report
                .rows
                .into_iter()
                .map(StatusRowApi::from)
                .collect::<Vec<StatusRowApi>>(),
        )),
        Err(_) => StatusResponse::Failure(BasicMessage::new(
            "Failed to compare files against the disk. Check server logs for details",
        )),
    }
}

/// fixes moved and modified files under `paths`, or every tracked file if no paths are passed
#[post("/repair", data = "<request>")]
pub fn repair(request: Json<RepairRequest>) -> RepairResponse {
    match service::repair(&request.paths) {
        Ok(rows) => RepairResponse::Success(Json::from(
            rows.into_iter()
                .map(RepairRowApi::from)
                .collect::<Vec<RepairRowApi>>(),
        )),
        Err(_) => RepairResponse::Failure(BasicMessage::new(
            "Failed to repair files. Check server logs for details",
        )),
    }
}

#[get("/<id>")]
pub fn get_file(id: u32) -> GetFileResponse {
    match service::get_file(id) {
        Ok(file) => GetFileResponse::Success(Json::from(FileApi::from(file))),
        Err(GetFileError::NotFound) => {
            GetFileResponse::FileNotFound(BasicMessage::new("No file with that id was found."))
        }
        Err(GetFileError::DbError(_)) => GetFileResponse::FileDbError(BasicMessage::new(
            "Failed to pull file info from database. Check server logs for details",
        )),
    }
}

#[get("/path?<path>")]
pub fn get_file_by_path(path: &str) -> GetFileResponse {
    match service::get_file_by_path(path) {
        Ok(file) => GetFileResponse::Success(Json::from(FileApi::from(file))),
        Err(GetFileError::NotFound) => {
            GetFileResponse::FileNotFound(BasicMessage::new("No file is tracked at that path."))
        }
        Err(GetFileError::DbError(_)) => GetFileResponse::FileDbError(BasicMessage::new(
            "Failed to pull file info from database. Check server logs for details",
        )),
    }
}

/// the tags on the file. With `implied`, also includes every tag those tags imply
#[get("/<id>/tags?<implied>")]
pub fn get_file_tags(id: u32, implied: Option<bool>) -> GetFileTagsResponse {
    if let Err(e) = service::get_file(id) {
        return match e {
            GetFileError::NotFound => GetFileTagsResponse::FileNotFound(BasicMessage::new(
                "No file with that id was found.",
            )),
            GetFileError::DbError(_) => GetFileTagsResponse::FileDbError(BasicMessage::new(
                "Failed to pull file info from database. Check server logs for details",
            )),
        };
    }
    let tags = if implied.unwrap_or(false) {
        tag_service::tags_for_file_implied(id)
    } else {
        tag_service::tags_for_file(id)
    };
    match tags {
        Ok(tags) => GetFileTagsResponse::Success(Json::from(
            tags.into_iter().map(TagApi::from).collect::<Vec<TagApi>>(),
        )),
        Err(GetTagError::TagNotFound) | Err(GetTagError::DbError(_)) => {
            GetFileTagsResponse::FileDbError(BasicMessage::new(
                "Failed to pull tags for file from database. Check server logs for details",
            ))
        }
    }
}

/// the tags on the file at `path`. Untracked paths have no tags
#[get("/tags?<path>")]
pub fn get_path_tags(path: &str) -> GetFileTagsResponse {
    match tag_service::tags_for_path(path) {
        Ok(tags) => GetFileTagsResponse::Success(Json::from(
            tags.into_iter().map(TagApi::from).collect::<Vec<TagApi>>(),
        )),
        Err(_) => GetFileTagsResponse::FileDbError(BasicMessage::new(
            "Failed to pull tags for file from database. Check server logs for details",
        )),
    }
}

#[post("/tags", data = "<request>")]
pub fn tag_file(request: Json<TagFileRequest>) -> TagFileResponse {
    match service::tag_file(&request.path, &request.tags) {
        Ok(file) => TagFileResponse::Success(Json::from(FileApi::from(file))),
        Err(TagRelationError::FileNotFound) => {
            TagFileResponse::NotFound(BasicMessage::new("No file exists at that path."))
        }
        Err(TagRelationError::TagNotFound(name)) => TagFileResponse::NotFound(Json::from(
            BasicMessage::from(format!("No tag named {name} exists.")),
        )),
        Err(_) => TagFileResponse::Failure(BasicMessage::new(
            "Failed to tag file. Check server logs for details",
        )),
    }
}

#[delete("/tags", data = "<request>")]
pub fn untag_file(request: Json<UntagFileRequest>) -> UntagFileResponse {
    let res = if request.all {
        service::untag_file_all(&request.path)
    } else {
        service::untag_file(&request.path, &request.tag_ids)
    };
    match res {
        Ok(()) => UntagFileResponse::Success(()),
        Err(TagRelationError::FileNotFound) => {
            UntagFileResponse::NotFound(BasicMessage::new("No file is tracked at that path."))
        }
        Err(_) => UntagFileResponse::Failure(BasicMessage::new(
            "Failed to untag file. Check server logs for details",
        )),
    }
}
