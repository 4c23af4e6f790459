#[derive(PartialEq, Debug)]
pub enum ImplicationError {
    /// an error with the database
    DbError(String),
    /// one side of the implication is not a tag. Holds the missing tag id
    TagNotFound(u32),
    /// the implied tag already (transitively) implies the implying tag, so adding the edge would create a cycle
    CircularImplication,
}
