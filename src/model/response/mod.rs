use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

use crate::files::{FileRecord, FileStatus, RepairAction, RepairRow, StatusRow};
use crate::implications::Implication;
use crate::tags::Tag;

pub mod file_responses;
pub mod implication_responses;
pub mod tag_responses;

pub type NoContent = ();

/// represents a basic json message
#[derive(Responder, Serialize, Deserialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct BasicMessage {
    pub message: String,
}

/// this will be the same no matter if it's a request or a response
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
#[serde(crate = "rocket::serde")]
pub struct TagApi {
    /// will be None if new
    pub id: Option<u32>,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(crate = "rocket::serde")]
pub struct FileApi {
    pub id: u32,
    pub path: String,
    pub fingerprint: String,
    /// rfc 3339
    #[serde(rename = "modTime")]
    pub mod_time: String,
    pub size: u64,
    #[serde(rename = "isDir")]
    pub is_dir: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(crate = "rocket::serde")]
pub struct ImplicationApi {
    pub tag: TagApi,
    #[serde(rename = "impliedTag")]
    pub implied_tag: TagApi,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(crate = "rocket::serde")]
pub struct StatusRowApi {
    pub path: String,
    /// one of `T` (tagged), `M` (modified), `!` (missing), or `U` (untagged)
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(crate = "rocket::serde")]
pub struct RepairRowApi {
    pub path: String,
    /// one of `moved`, `updated`, or `missing`
    pub action: String,
    /// where a moved file used to be
    #[serde(
        rename = "previousPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_path: Option<String>,
}

// ----------------------------------

impl BasicMessage {
    pub fn new(message: &str) -> Json<BasicMessage> {
        Json::from(BasicMessage {
            message: message.to_string(),
        })
    }
}

impl From<&str> for BasicMessage {
    fn from(value: &str) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

impl From<String> for BasicMessage {
    fn from(value: String) -> Self {
        Self { message: value }
    }
}

impl From<Tag> for TagApi {
    fn from(value: Tag) -> Self {
        TagApi {
            id: Some(value.id),
            name: value.name,
        }
    }
}

impl From<FileRecord> for FileApi {
    fn from(value: FileRecord) -> Self {
        FileApi {
            id: value.id,
            path: value.path,
            fingerprint: value.fingerprint,
            mod_time: value.mod_time.to_rfc3339(),
            size: value.size,
            is_dir: value.is_dir,
        }
    }
}

impl From<Implication> for ImplicationApi {
    fn from(value: Implication) -> Self {
        ImplicationApi {
            tag: TagApi::from(value.tag),
            implied_tag: TagApi::from(value.implied_tag),
        }
    }
}

impl From<StatusRow> for StatusRowApi {
    fn from(value: StatusRow) -> Self {
        let status = match value.status {
            FileStatus::Tagged => "T",
            FileStatus::Modified => "M",
            FileStatus::Missing => "!",
            FileStatus::Untagged => "U",
        };
        StatusRowApi {
            path: value.path,
            status: status.to_string(),
        }
    }
}

impl From<RepairRow> for RepairRowApi {
    fn from(value: RepairRow) -> Self {
        let (action, previous_path) = match value.action {
            RepairAction::Moved(from) => ("moved", Some(from)),
            RepairAction::Updated => ("updated", None),
            RepairAction::Missing => ("missing", None),
        };
        RepairRowApi {
            path: value.path,
            action: action.to_string(),
            previous_path,
        }
    }
}
