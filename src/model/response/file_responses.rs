use rocket::serde::json::Json;

use crate::model::response::{
    BasicMessage, FileApi, NoContent, RepairRowApi, StatusRowApi, TagApi,
};

#[derive(Responder)]
pub enum ListFilesResponse {
    #[response(status = 404, content_type = "json")]
    TagNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    Failure(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<String>>),
}

#[derive(Responder)]
pub enum GetFileResponse {
    #[response(status = 404, content_type = "json")]
    FileNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<FileApi>),
}

#[derive(Responder)]
pub enum GetFileTagsResponse {
    #[response(status = 404, content_type = "json")]
    FileNotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    FileDbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<TagApi>>),
}

#[derive(Responder)]
pub enum TagFileResponse {
    #[response(status = 404, content_type = "json")]
    NotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    Failure(Json<BasicMessage>),
    #[response(status = 201)]
    Success(Json<FileApi>),
}

#[derive(Responder)]
pub enum UntagFileResponse {
    #[response(status = 404, content_type = "json")]
    NotFound(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    Failure(Json<BasicMessage>),
    #[response(status = 204)]
    Success(NoContent),
}

#[derive(Responder)]
pub enum StatusResponse {
    #[response(status = 500, content_type = "json")]
    Failure(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<StatusRowApi>>),
}

#[derive(Responder)]
pub enum RepairResponse {
    #[response(status = 500, content_type = "json")]
    Failure(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<RepairRowApi>>),
}
