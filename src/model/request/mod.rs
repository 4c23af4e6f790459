use rocket::serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct TagFileRequest {
    /// path of the file on disk. Relative paths are resolved against the server's working directory
    pub path: String,
    /// names of the tags to add
    pub tags: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct UntagFileRequest {
    pub path: String,
    #[serde(rename = "tagIds", default)]
    pub tag_ids: Vec<u32>,
    /// removes every tag from the file, ignoring `tag_ids`
    #[serde(default)]
    pub all: bool,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct RepairRequest {
    /// files and directories to repair. Empty repairs every tracked file
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct AddImplicationRequest {
    #[serde(rename = "tagId")]
    pub tag_id: u32,
    #[serde(rename = "impliedTagId")]
    pub implied_tag_id: u32,
}

/// query parameters for listing files. See [`crate::files::FileQuery`]
#[derive(FromForm, Debug, Default)]
pub struct FileQueryApi {
    pub tags: Vec<String>,
    pub all: bool,
    pub top: bool,
    pub leaf: bool,
    pub file: bool,
    pub directory: bool,
    pub recursive: bool,
    pub implied: bool,
}

impl From<FileQueryApi> for crate::files::FileQuery {
    fn from(value: FileQueryApi) -> Self {
        crate::files::FileQuery {
            tags: value.tags,
            all: value.all,
            top: value.top,
            leaf: value.leaf,
            file: value.file,
            directory: value.directory,
            recursive: value.recursive,
            implied: value.implied,
        }
    }
}
