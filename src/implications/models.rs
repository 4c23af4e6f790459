use crate::tags::Tag;

/// a rule that any file carrying `tag` should be treated as also carrying `implied_tag`
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Implication {
    pub tag: Tag,
    pub implied_tag: Tag,
}

impl Implication {
    /// the edge this implication represents, as (implying tag id, implied tag id)
    pub fn edge(&self) -> (u32, u32) {
        (self.tag.id, self.implied_tag.id)
    }
}
