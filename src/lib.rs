pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod service;
pub mod tags;
pub mod validation;

pub use db::Database;
pub use error::{Field, SiteError, ValidationErrors, Violation};
pub use models::{Site, SiteBuilder, SiteId, Tag, TagId, TagKind};
pub use repository::SiteRepository;
pub use service::SiteService;
pub use tags::TagStore;
pub use validation::{SitePayload, TagPayload};
