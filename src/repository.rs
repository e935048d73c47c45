use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::error::{Result, SiteError};
use crate::{Site, SiteBuilder, SiteId, Tag, TagId, TagKind};

/// Row-level access to sites and their tag links.
///
/// Like [`TagStore`](crate::TagStore) it borrows a connection, so every
/// method participates in whatever transaction the caller has open. The
/// repository does not check the "at least one tag of each kind" rule; that
/// is enforced by the service before anything is written.
pub struct SiteRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SiteRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Returns all sites in creation order.
    pub fn list(&self) -> Result<Vec<Site>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, active, created_at, updated_at FROM sites ORDER BY id",
        )?;
        let rows = stmt.query_map([], site_row)?;

        let mut sites = Vec::new();
        for row in rows {
            sites.push(self.with_tags(row?)?);
        }
        Ok(sites)
    }

    /// Returns the site with the given ID and its tags.
    pub fn get(&self, id: SiteId) -> Result<Site> {
        let builder = self
            .conn
            .prepare_cached(
                "SELECT id, name, active, created_at, updated_at FROM sites WHERE id = ?1",
            )?
            .query_row([id.get()], site_row)
            .optional()?
            .ok_or(SiteError::NotFound(id))?;

        self.with_tags(builder)
    }

    /// Returns the ID of the site holding exactly `name`, active or not.
    pub fn find_by_name(&self, name: &str) -> Result<Option<SiteId>> {
        let id = self
            .conn
            .prepare_cached("SELECT id FROM sites WHERE name = ?1")?
            .query_row([name], |row| row.get(0))
            .optional()?;

        Ok(id.map(SiteId::new))
    }

    /// Inserts a site with no tags.
    ///
    /// Fails with a name conflict if any site already holds `name`.
    pub fn create(&self, name: &str, active: bool) -> Result<Site> {
        if self.find_by_name(name)?.is_some() {
            return Err(SiteError::conflict());
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.conn
            .prepare_cached(
                "INSERT INTO sites (name, active, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            )?
            .execute(rusqlite::params![name, active, now])
            .map_err(name_conflict)?;

        self.get(SiteId::new(self.conn.last_insert_rowid()))
    }

    /// Replaces every link of `kind` on the site with `tag_ids`, keeping their
    /// order.
    pub fn replace_tags(&self, site: SiteId, kind: TagKind, tag_ids: &[TagId]) -> Result<()> {
        let table = kind.link_table();

        self.conn
            .prepare_cached(&format!("DELETE FROM {table} WHERE site_id = ?1"))?
            .execute([site.get()])?;

        let mut insert = self.conn.prepare_cached(&format!(
            "INSERT INTO {table} (site_id, tag_id, position) VALUES (?1, ?2, ?3)"
        ))?;
        for (position, tag_id) in tag_ids.iter().enumerate() {
            insert.execute(rusqlite::params![site.get(), tag_id.get(), position as i64])?;
        }

        Ok(())
    }

    /// Renames a site.
    ///
    /// Renaming to the current name succeeds without writing. Fails with a
    /// name conflict if a different site holds `name`.
    pub fn rename(&self, site: SiteId, name: &str) -> Result<()> {
        match self.find_by_name(name)? {
            Some(holder) if holder == site => return Ok(()),
            Some(_) => return Err(SiteError::conflict()),
            None => {}
        }

        let now = OffsetDateTime::now_utc().unix_timestamp();
        let changed = self
            .conn
            .prepare_cached("UPDATE sites SET name = ?1, updated_at = ?2 WHERE id = ?3")?
            .execute(rusqlite::params![name, now, site.get()])
            .map_err(name_conflict)?;

        if changed == 0 {
            return Err(SiteError::NotFound(site));
        }
        Ok(())
    }

    /// Sets the active flag.
    pub fn set_active(&self, site: SiteId, active: bool) -> Result<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let changed = self
            .conn
            .prepare_cached("UPDATE sites SET active = ?1, updated_at = ?2 WHERE id = ?3")?
            .execute(rusqlite::params![active, now, site.get()])?;

        if changed == 0 {
            return Err(SiteError::NotFound(site));
        }
        Ok(())
    }

    /// Bumps `updated_at` without changing anything else.
    pub fn touch(&self, site: SiteId) -> Result<()> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        self.conn
            .prepare_cached("UPDATE sites SET updated_at = ?1 WHERE id = ?2")?
            .execute(rusqlite::params![now, site.get()])?;
        Ok(())
    }

    /// Deletes a site and its links. Tags are left in place since other
    /// sites may use them.
    pub fn delete(&self, site: SiteId) -> Result<()> {
        let deleted = self
            .conn
            .prepare_cached("DELETE FROM sites WHERE id = ?1")?
            .execute([site.get()])?;

        if deleted == 0 {
            return Err(SiteError::NotFound(site));
        }
        Ok(())
    }

    /// Returns the number of stored sites.
    pub fn count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM sites", [], |row| row.get(0))?)
    }

    fn with_tags(&self, builder: SiteBuilder) -> Result<Site> {
        let site = builder.build();
        let urls = self.tags(site.id, TagKind::Url)?;
        let categories = self.tags(site.id, TagKind::Category)?;

        Ok(Site {
            urls,
            categories,
            ..site
        })
    }

    fn tags(&self, site: SiteId, kind: TagKind) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT t.id, t.description
             FROM {link} l
             JOIN {tags} t ON l.tag_id = t.id
             WHERE l.site_id = ?1
             ORDER BY l.position",
            link = kind.link_table(),
            tags = kind.tag_table(),
        ))?;

        let rows = stmt.query_map([site.get()], |row| {
            Ok(Tag::new(TagId::new(row.get(0)?), row.get::<_, String>(1)?))
        })?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }
}

fn site_row(row: &Row<'_>) -> rusqlite::Result<SiteBuilder> {
    Ok(SiteBuilder::new()
        .id(SiteId::new(row.get(0)?))
        .name(row.get::<_, String>(1)?)
        .active(row.get(2)?)
        .created_at(timestamp(row, 3)?)
        .updated_at(timestamp(row, 4)?))
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<OffsetDateTime> {
    let secs: i64 = row.get(idx)?;
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

/// Maps a unique-constraint failure on `sites.name` to a conflict.
fn name_conflict(err: rusqlite::Error) -> SiteError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err
        && e.code == ErrorCode::ConstraintViolation
    {
        return SiteError::conflict();
    }
    SiteError::Storage(err)
}
