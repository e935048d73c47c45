use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independent tag namespaces a site is labelled with.
///
/// Each kind owns its own tag table and link table, so the same description
/// may exist once as a URL and once as a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// Addresses the site is reachable at.
    Url,
    /// Classification labels.
    Category,
}

impl TagKind {
    /// All kinds, in the order the reconciliation pass handles them.
    pub const ALL: [TagKind; 2] = [TagKind::Url, TagKind::Category];

    /// Field name used in request and response bodies.
    pub fn field(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Category => "category",
        }
    }

    /// Table holding the tag rows of this kind.
    pub(crate) fn tag_table(self) -> &'static str {
        match self {
            Self::Url => "url_tags",
            Self::Category => "category_tags",
        }
    }

    /// Junction table linking sites to tags of this kind.
    pub(crate) fn link_table(self) -> &'static str {
        match self {
            Self::Url => "site_urls",
            Self::Category => "site_categories",
        }
    }

    /// Message reported when a request supplies an empty list of this kind.
    pub fn empty_list_message(self) -> &'static str {
        match self {
            Self::Url => "At least one URL is required",
            Self::Category => "At least one Category is required",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}
