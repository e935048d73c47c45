//! Request payloads and the pure validation pass run before any write.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{Field, ValidationErrors, Violation};
use crate::TagKind;

/// Longest accepted site name or tag description, in characters.
pub const MAX_TEXT_LEN: usize = 100;

/// Body of a create or update request.
///
/// Every field is optional at the parsing level so that absent fields can be
/// reported as violations instead of parse failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitePayload {
    pub name: Option<String>,
    pub active: Option<bool>,
    pub url: Option<Vec<TagPayload>>,
    pub category: Option<Vec<TagPayload>>,
}

/// One entry of a `url` or `category` list. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagPayload {
    pub description: Option<String>,
}

impl TagPayload {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

impl SitePayload {
    /// Builds a payload from plain strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use sites::SitePayload;
    ///
    /// let payload = SitePayload::new("Example", &["example.com"], &["news"]);
    /// assert_eq!(payload.name.as_deref(), Some("Example"));
    /// assert_eq!(payload.active, None);
    /// ```
    pub fn new(name: &str, urls: &[&str], categories: &[&str]) -> Self {
        Self {
            name: Some(name.to_string()),
            active: None,
            url: Some(urls.iter().copied().map(TagPayload::new).collect()),
            category: Some(categories.iter().copied().map(TagPayload::new).collect()),
        }
    }

    /// Sets the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}

/// A request that passed validation.
///
/// Names and descriptions are trimmed, and each tag list holds every
/// description once, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDraft {
    pub name: String,
    pub active: Option<bool>,
    pub urls: Vec<String>,
    pub categories: Vec<String>,
}

impl SiteDraft {
    /// Returns the deduplicated descriptions for the given kind.
    pub fn descriptions(&self, kind: TagKind) -> &[String] {
        match kind {
            TagKind::Url => &self.urls,
            TagKind::Category => &self.categories,
        }
    }
}

/// Validates a payload without touching storage.
///
/// Structural problems (missing or over-long fields) are all reported
/// together. Only when there are none are empty lists checked, and both empty
/// lists are reported together. Name uniqueness needs the store and is checked
/// by the service afterwards.
pub fn validate(payload: SitePayload) -> Result<SiteDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = text(payload.name, Field::Name, &mut errors);
    let urls = tag_list(payload.url, TagKind::Url, &mut errors);
    let categories = tag_list(payload.category, TagKind::Category, &mut errors);

    let (Some(name), Some(urls), Some(categories)) = (name, urls, categories) else {
        return Err(errors);
    };

    for (kind, list) in [(TagKind::Url, &urls), (TagKind::Category, &categories)] {
        if list.is_empty() {
            errors.push(Violation::EmptyList(kind));
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SiteDraft {
        name,
        active: payload.active,
        urls: dedup(urls),
        categories: dedup(categories),
    })
}

fn text(value: Option<String>, field: Field, errors: &mut ValidationErrors) -> Option<String> {
    let trimmed = value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match trimmed {
        None => {
            errors.push(Violation::MissingField(field));
            None
        }
        Some(s) if s.chars().count() > MAX_TEXT_LEN => {
            errors.push(Violation::TooLong {
                field,
                max: MAX_TEXT_LEN,
            });
            None
        }
        Some(s) => Some(s.to_string()),
    }
}

fn tag_list(
    items: Option<Vec<TagPayload>>,
    kind: TagKind,
    errors: &mut ValidationErrors,
) -> Option<Vec<String>> {
    let Some(items) = items else {
        errors.push(Violation::MissingField(Field::List(kind)));
        return None;
    };

    let mut descriptions = Vec::with_capacity(items.len());
    let mut valid = true;
    for (index, item) in items.into_iter().enumerate() {
        match text(item.description, Field::Description { kind, index }, errors) {
            Some(description) => descriptions.push(description),
            None => valid = false,
        }
    }

    valid.then_some(descriptions)
}

fn dedup(descriptions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    descriptions
        .into_iter()
        .filter(|d| seen.insert(d.clone()))
        .collect()
}
