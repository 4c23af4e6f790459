//! a read mostly filesystem view of the tag database.
//!
//! The mount point contains a single tag root directory. Inside it every tag is a directory, and inside
//! a tag directory are the tags that share files with it along with a symbolic link to each of those files.
//! Deleting a link removes the tags in its path from the file. Nothing else can be changed

pub mod entry_name;
#[cfg(feature = "fuse")]
pub mod fuse;
pub mod projection;
