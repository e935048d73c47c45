use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{SiteId, Tag, TagKind};

/// A catalogued site with its resolved URL and category tags.
///
/// Tag lists are kept in the order they were attached, which is the order of
/// first appearance in the request that last set them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Unique identifier from the database.
    pub id: SiteId,
    /// Unique, case-sensitive display name.
    pub name: String,
    /// Whether the site is active. Inactive sites still reserve their name.
    pub active: bool,
    /// URL tags, in attachment order.
    #[serde(rename = "url")]
    pub urls: Vec<Tag>,
    /// Category tags, in attachment order.
    #[serde(rename = "category")]
    pub categories: Vec<Tag>,
    /// When this site was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When this site was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Site {
    /// Returns the tags of the given kind.
    pub fn tags(&self, kind: TagKind) -> &[Tag] {
        match kind {
            TagKind::Url => &self.urls,
            TagKind::Category => &self.categories,
        }
    }

    /// Returns the descriptions of the tags of the given kind, in order.
    pub fn descriptions(&self, kind: TagKind) -> Vec<&str> {
        self.tags(kind).iter().map(Tag::description).collect()
    }
}

/// Builder for constructing `Site` instances with optional fields.
///
/// # Examples
///
/// ```
/// use sites::{SiteBuilder, SiteId};
///
/// let site = SiteBuilder::new()
///     .id(SiteId::new(1))
///     .name("Example")
///     .build();
///
/// assert_eq!(site.id, SiteId::new(1));
/// assert!(site.active);
/// assert!(site.urls.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SiteBuilder {
    id: Option<SiteId>,
    name: Option<String>,
    active: Option<bool>,
    urls: Option<Vec<Tag>>,
    categories: Option<Vec<Tag>>,
    created_at: Option<OffsetDateTime>,
    updated_at: Option<OffsetDateTime>,
}

impl SiteBuilder {
    /// Creates a new `SiteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the site ID.
    pub fn id(mut self, id: SiteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the site name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Sets the URL tags.
    pub fn urls(mut self, urls: Vec<Tag>) -> Self {
        self.urls = Some(urls);
        self
    }

    /// Sets the category tags.
    pub fn categories(mut self, categories: Vec<Tag>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Sets the created timestamp.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the updated timestamp.
    pub fn updated_at(mut self, updated_at: OffsetDateTime) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Builds the `Site`. `active` defaults to `true`, tag lists to empty and
    /// timestamps to now.
    ///
    /// # Panics
    ///
    /// Panics if `id` or `name` have not been set.
    pub fn build(self) -> Site {
        let now = OffsetDateTime::now_utc();
        Site {
            id: self.id.expect("id is required"),
            name: self.name.expect("name is required"),
            active: self.active.unwrap_or(true),
            urls: self.urls.unwrap_or_default(),
            categories: self.categories.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TagId;
    use time::macros::datetime;

    #[test]
    fn builder_defaults_to_active_with_no_tags() {
        let site = SiteBuilder::new().id(SiteId::new(1)).name("Test").build();

        assert!(site.active);
        assert!(site.urls.is_empty());
        assert!(site.categories.is_empty());
    }

    #[test]
    #[should_panic(expected = "name is required")]
    fn builder_requires_name() {
        SiteBuilder::new().id(SiteId::new(1)).build();
    }

    #[test]
    fn serializes_tag_lists_under_singular_keys() {
        let at = datetime!(2024-01-02 03:04:05 UTC);
        let site = SiteBuilder::new()
            .id(SiteId::new(1))
            .name("Test")
            .active(false)
            .urls(vec![Tag::new(TagId::new(1), "test.com")])
            .categories(vec![Tag::new(TagId::new(2), "test")])
            .created_at(at)
            .updated_at(at)
            .build();

        let json = serde_json::to_value(&site).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Test");
        assert_eq!(json["active"], false);
        assert_eq!(json["url"][0]["description"], "test.com");
        assert_eq!(json["category"][0]["id"], 2);
        assert_eq!(json["created_at"], "2024-01-02T03:04:05Z");
    }

    #[test]
    fn descriptions_follow_attachment_order() {
        let site = SiteBuilder::new()
            .id(SiteId::new(1))
            .name("Test")
            .urls(vec![
                Tag::new(TagId::new(9), "b.com"),
                Tag::new(TagId::new(2), "a.com"),
            ])
            .build();

        assert_eq!(site.descriptions(TagKind::Url), vec!["b.com", "a.com"]);
        assert!(site.descriptions(TagKind::Category).is_empty());
    }
}
