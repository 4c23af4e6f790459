/// the outcomes the virtual filesystem can report back to the kernel besides success
#[derive(PartialEq, Debug, Clone)]
pub enum VfsError {
    /// the synthetic path does not name a tag, a tag directory, or a tracked file
    NotFound,
    /// the path exists, but the operation is forbidden on it (e.g. unlinking a tag directory)
    NotPermitted,
    /// the operation has no meaning for a tag hierarchy
    Unsupported,
    /// everything else. Holds the context of the failing store call
    Internal(String),
}
