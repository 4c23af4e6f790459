/// represents a tag in the tag table of the database
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone)]
pub struct Tag {
    /// the id of the tag
    pub id: u32,
    /// the unique name of the tag. Also used as the directory name in the tag mount
    pub name: String,
}
