use serde::{Deserialize, Serialize};

use super::TagId;

/// A shared, reusable label identified by its description.
///
/// Two tags of the same kind never share a description; deduplication is by
/// exact, case-sensitive match on `description`, not by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: TagId,
    description: String,
}

impl Tag {
    /// Creates a new tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use sites::{Tag, TagId};
    ///
    /// let tag = Tag::new(TagId::new(1), "example.com");
    /// assert_eq!(tag.id(), TagId::new(1));
    /// assert_eq!(tag.description(), "example.com");
    /// ```
    pub fn new(id: TagId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    /// Returns the tag's identifier.
    pub fn id(&self) -> TagId {
        self.id
    }

    /// Returns the tag's description.
    pub fn description(&self) -> &str {
        &self.description
    }
}
