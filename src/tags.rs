use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::{Tag, TagId, TagKind};

/// Get-or-create access to the URL and category tag tables.
///
/// Borrows a connection, so it can run inside a caller's transaction by
/// passing the `Transaction` (which derefs to `Connection`).
pub struct TagStore<'c> {
    conn: &'c Connection,
}

impl<'c> TagStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Returns the tag of `kind` whose description is exactly `description`,
    /// creating it first if it does not exist.
    ///
    /// Idempotent: repeated calls return the same ID and never add a second
    /// row. The insert is `INSERT OR IGNORE` against the unique index on
    /// `description`, so a concurrent writer that created the row first is
    /// simply found by the lookup that follows.
    ///
    /// # Examples
    ///
    /// ```
    /// use sites::{Database, TagKind, TagStore};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let db = Database::in_memory()?;
    /// let store = TagStore::new(db.connection());
    ///
    /// let first = store.resolve(TagKind::Url, "example.com")?;
    /// let second = store.resolve(TagKind::Url, "example.com")?;
    /// assert_eq!(first, second);
    /// # Ok(())
    /// # }
    /// ```
    pub fn resolve(&self, kind: TagKind, description: &str) -> Result<TagId> {
        let table = kind.tag_table();

        self.conn
            .prepare_cached(&format!(
                "INSERT OR IGNORE INTO {table} (description) VALUES (?1)"
            ))?
            .execute([description])?;

        let id: i64 = self
            .conn
            .prepare_cached(&format!("SELECT id FROM {table} WHERE description = ?1"))?
            .query_row([description], |row| row.get(0))?;

        Ok(TagId::new(id))
    }

    /// Looks up a tag without creating it.
    pub fn find(&self, kind: TagKind, description: &str) -> Result<Option<Tag>> {
        let table = kind.tag_table();

        let tag = self
            .conn
            .prepare_cached(&format!(
                "SELECT id, description FROM {table} WHERE description = ?1"
            ))?
            .query_row([description], |row| {
                Ok(Tag::new(TagId::new(row.get(0)?), row.get::<_, String>(1)?))
            })
            .optional()?;

        Ok(tag)
    }

    /// Returns every tag of `kind`, ordered by ID.
    pub fn all(&self, kind: TagKind) -> Result<Vec<Tag>> {
        let table = kind.tag_table();
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT id, description FROM {table} ORDER BY id"))?;

        let rows = stmt.query_map([], |row| {
            Ok(Tag::new(TagId::new(row.get(0)?), row.get::<_, String>(1)?))
        })?;

        let mut tags = Vec::new();
        for row in rows {
            tags.push(row?);
        }
        Ok(tags)
    }
}
