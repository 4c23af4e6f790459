// every `DbError` carries the identifying context of the operation that failed (tag name, id, or path)

#[derive(PartialEq, Debug)]
pub enum CreateTagError {
    /// an error with the database
    DbError(String),
    /// the name breaks the tag naming rules. Holds the reason
    InvalidName(String),
    /// a tag with that name already exists
    AlreadyExists,
}

#[derive(PartialEq, Debug)]
pub enum GetTagError {
    /// an error with the database
    DbError(String),
    /// the tag was not found
    TagNotFound,
}

#[derive(PartialEq, Debug)]
pub enum UpdateTagError {
    /// an error with the database
    DbError(String),
    /// no tag with that id can be found
    TagNotFound,
    /// the new name breaks the tag naming rules. Holds the reason
    InvalidName(String),
    /// a tag with the selected name already exists, and is not the tag being updated
    NewNameAlreadyExists,
}

#[derive(PartialEq, Debug)]
pub enum CopyTagError {
    /// an error with the database
    DbError(String),
    /// the tag being copied does not exist
    TagNotFound,
    /// the name of the copy breaks the tag naming rules. Holds the reason
    InvalidName(String),
    /// a tag with the name of the copy already exists
    NewNameAlreadyExists,
}

#[derive(PartialEq, Debug)]
pub enum DeleteTagError {
    /// an error with the database
    DbError(String),
    /// no tag with the passed id was found
    TagNotFound,
}
