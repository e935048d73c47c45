use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, SiteError};
use crate::validation::{SiteDraft, SitePayload, validate};
use crate::{Database, Site, SiteId, SiteRepository, TagKind, TagStore};

/// Service layer turning site requests into stored sites.
///
/// SiteService owns the Database and runs each create or update as a single
/// transaction: validation first, then the site row, then tag resolution and
/// link replacement. Any failure drops the transaction un-committed, so a
/// rejected request leaves storage exactly as it found it.
///
/// # Examples
///
/// ```
/// use sites::{Database, SitePayload, SiteService};
///
/// # fn main() -> anyhow::Result<()> {
/// let service = SiteService::new(Database::in_memory()?);
///
/// let site = service.create_site(SitePayload::new("Example", &["example.com"], &["news"]))?;
/// assert_eq!(site.name, "Example");
/// assert!(site.active);
/// # Ok(())
/// # }
/// ```
pub struct SiteService {
    db: Database,
}

impl SiteService {
    /// Creates a new SiteService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Lists every site in creation order.
    pub fn list_sites(&self) -> Result<Vec<Site>> {
        SiteRepository::new(self.db.connection()).list()
    }

    /// Fetches one site, or `NotFound`.
    pub fn get_site(&self, id: SiteId) -> Result<Site> {
        SiteRepository::new(self.db.connection()).get(id)
    }

    /// Creates a site from a request payload.
    ///
    /// `active` defaults to `true`. Fails with `Invalid` if the payload does
    /// not validate or the name is taken; nothing is written in that case.
    pub fn create_site(&self, payload: SitePayload) -> Result<Site> {
        let draft = validate(payload).inspect_err(|errors| {
            debug!(%errors, "create rejected");
        })?;

        let tx = self.db.connection().unchecked_transaction()?;
        let repo = SiteRepository::new(&tx);

        if repo.find_by_name(&draft.name)?.is_some() {
            debug!(name = %draft.name, "create rejected: name taken");
            return Err(SiteError::conflict());
        }

        let created = repo.create(&draft.name, draft.active.unwrap_or(true))?;
        reconcile_tags(&tx, created.id, &draft)?;
        let site = repo.get(created.id)?;
        tx.commit()?;

        info!(
            site_id = %site.id,
            name = %site.name,
            urls = site.urls.len(),
            categories = site.categories.len(),
            "site created"
        );
        Ok(site)
    }

    /// Updates a site from a request payload.
    ///
    /// The payload follows the same rules as [`create_site`](Self::create_site),
    /// except that keeping the current name is not a conflict and an omitted
    /// `active` leaves the flag unchanged. Both tag lists are replaced
    /// wholesale. Fails with `NotFound` before validating if `id` is unknown.
    pub fn update_site(&self, id: SiteId, payload: SitePayload) -> Result<Site> {
        let tx = self.db.connection().unchecked_transaction()?;
        let repo = SiteRepository::new(&tx);
        repo.get(id)?;

        let draft = validate(payload).inspect_err(|errors| {
            debug!(site_id = %id, %errors, "update rejected");
        })?;

        if let Some(holder) = repo.find_by_name(&draft.name)?
            && holder != id
        {
            debug!(site_id = %id, name = %draft.name, "update rejected: name taken");
            return Err(SiteError::conflict());
        }

        repo.rename(id, &draft.name)?;
        if let Some(active) = draft.active {
            repo.set_active(id, active)?;
        }
        reconcile_tags(&tx, id, &draft)?;
        repo.touch(id)?;
        let site = repo.get(id)?;
        tx.commit()?;

        info!(
            site_id = %site.id,
            name = %site.name,
            urls = site.urls.len(),
            categories = site.categories.len(),
            "site updated"
        );
        Ok(site)
    }

    /// Deletes a site and its tag links, or fails with `NotFound`.
    pub fn delete_site(&self, id: SiteId) -> Result<()> {
        SiteRepository::new(self.db.connection()).delete(id)?;
        info!(site_id = %id, "site deleted");
        Ok(())
    }
}

/// Resolves each tag list of the draft through the tag store and replaces the
/// site's links with the result, one kind at a time.
fn reconcile_tags(conn: &Connection, site: SiteId, draft: &SiteDraft) -> Result<()> {
    let store = TagStore::new(conn);
    let repo = SiteRepository::new(conn);

    for kind in TagKind::ALL {
        let ids = draft
            .descriptions(kind)
            .iter()
            .map(|description| store.resolve(kind, description))
            .collect::<Result<Vec<_>>>()?;
        repo.replace_tags(site, kind, &ids)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests;
