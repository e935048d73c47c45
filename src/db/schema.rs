/// Complete database schema for the site catalog.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// Descriptions and names use the default BINARY collation, so uniqueness is
/// case-sensitive.
pub const INITIAL_SCHEMA: &str = r#"
-- Sites table: one row per catalogued site
CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- URL tags: shared across sites, unique by description
CREATE TABLE IF NOT EXISTS url_tags (
    id INTEGER PRIMARY KEY,
    description TEXT NOT NULL UNIQUE
);

-- Category tags: same shape as url_tags, separate namespace
CREATE TABLE IF NOT EXISTS category_tags (
    id INTEGER PRIMARY KEY,
    description TEXT NOT NULL UNIQUE
);

-- Junction tables: position keeps the request order of the tags
CREATE TABLE IF NOT EXISTS site_urls (
    site_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (site_id, tag_id),
    FOREIGN KEY (site_id) REFERENCES sites(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES url_tags(id)
);

CREATE TABLE IF NOT EXISTS site_categories (
    site_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (site_id, tag_id),
    FOREIGN KEY (site_id) REFERENCES sites(id) ON DELETE CASCADE,
    FOREIGN KEY (tag_id) REFERENCES category_tags(id)
);

CREATE INDEX IF NOT EXISTS idx_site_urls_tag ON site_urls(tag_id);
CREATE INDEX IF NOT EXISTS idx_site_categories_tag ON site_categories(tag_id);
"#;
