mod ids;
mod site;
mod tag;
mod tag_kind;

pub use ids::{SiteId, TagId};
pub use site::{Site, SiteBuilder};
pub use tag::Tag;
pub use tag_kind::TagKind;
