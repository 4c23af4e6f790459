use rocket::serde::json::Json;

use crate::implications::service;
use crate::model::error::implication_errors::ImplicationError;
use crate::model::request::AddImplicationRequest;
use crate::model::response::implication_responses::{
    AddImplicationResponse, GetImplicationsResponse, RemoveImplicationResponse,
};
use crate::model::response::{BasicMessage, ImplicationApi};

/// every implication, or with `tag` only the implications reachable from those tags
#[get("/?<tag>")]
pub fn get_implications(tag: Vec<u32>) -> GetImplicationsResponse {
    let implications = if tag.is_empty() {
        service::get_all_implications()
    } else {
        service::implications_for_tags(&tag)
    };
    match implications {
        Ok(implications) => GetImplicationsResponse::Success(Json::from(
            implications
                .into_iter()
                .map(ImplicationApi::from)
                .collect::<Vec<ImplicationApi>>(),
        )),
        Err(_) => GetImplicationsResponse::DbError(BasicMessage::new(
            "Failed to pull implications from database. Check server logs for details",
        )),
    }
}

#[post("/", data = "<request>")]
pub fn add_implication(request: Json<AddImplicationRequest>) -> AddImplicationResponse {
    match service::add_implication(request.tag_id, request.implied_tag_id) {
        Ok(()) => AddImplicationResponse::Success(()),
        Err(ImplicationError::TagNotFound(id)) => AddImplicationResponse::TagNotFound(Json::from(
            BasicMessage::from(format!("No tag with id {id} was found.")),
        )),
        Err(ImplicationError::CircularImplication) => AddImplicationResponse::Circular(
            BasicMessage::new("The implied tag already implies the tag, so this would create a cycle."),
        ),
        Err(ImplicationError::DbError(_)) => AddImplicationResponse::DbError(BasicMessage::new(
            "Failed to add implication to database. Check server logs for details",
        )),
    }
}

#[delete("/<tag_id>/<implied_tag_id>")]
pub fn remove_implication(tag_id: u32, implied_tag_id: u32) -> RemoveImplicationResponse {
    match service::remove_implication(tag_id, implied_tag_id) {
        Ok(()) => RemoveImplicationResponse::Success(()),
        Err(_) => RemoveImplicationResponse::DbError(BasicMessage::new(
            "Failed to remove implication from database. Check server logs for details",
        )),
    }
}

/// removes every implication the tag is on either side of
#[delete("/<tag_id>")]
pub fn remove_implications_for_tag(tag_id: u32) -> RemoveImplicationResponse {
    match service::remove_implications_for_tag(tag_id) {
        Ok(()) => RemoveImplicationResponse::Success(()),
        Err(_) => RemoveImplicationResponse::DbError(BasicMessage::new(
            "Failed to remove implications from database. Check server logs for details",
        )),
    }
}
