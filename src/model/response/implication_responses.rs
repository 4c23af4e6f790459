use rocket::serde::json::Json;

use crate::model::response::{BasicMessage, ImplicationApi, NoContent};

#[derive(Responder)]
pub enum GetImplicationsResponse {
    #[response(status = 500, content_type = "json")]
    DbError(Json<BasicMessage>),
    #[response(status = 200)]
    Success(Json<Vec<ImplicationApi>>),
}

#[derive(Responder)]
pub enum AddImplicationResponse {
    #[response(status = 404, content_type = "json")]
    TagNotFound(Json<BasicMessage>),
    #[response(status = 409, content_type = "json")]
    Circular(Json<BasicMessage>),
    #[response(status = 500, content_type = "json")]
    DbError(Json<BasicMessage>),
    #[response(status = 201)]
    Success(NoContent),
}

#[derive(Responder)]
pub enum RemoveImplicationResponse {
    #[response(status = 500, content_type = "json")]
    DbError(Json<BasicMessage>),
    #[response(status = 204)]
    Success(NoContent),
}
