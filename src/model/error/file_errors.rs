#[derive(PartialEq, Debug)]
pub enum GetFileError {
    /// no file with that id or path is tracked
    NotFound,
    /// an error with the database
    DbError(String),
}

#[derive(PartialEq, Debug)]
pub enum TagRelationError {
    /// an error with the database
    DbError(String),
    /// the file is not tracked, or doesn't exist on disk when trying to tag it
    FileNotFound,
    /// no tag with the passed name or id was found. Holds the name or id that failed
    TagNotFound(String),
    /// reading the file or walking a directory failed
    FileSystemError(String),
}

impl From<GetFileError> for TagRelationError {
    fn from(value: GetFileError) -> Self {
        match value {
            GetFileError::NotFound => TagRelationError::FileNotFound,
            GetFileError::DbError(e) => TagRelationError::DbError(e),
        }
    }
}
