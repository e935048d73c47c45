use super::*;
use crate::error::{Field, Violation};
use crate::validation::TagPayload;

fn create_test_service() -> SiteService {
    let db = Database::in_memory().expect("failed to create in-memory database");
    SiteService::new(db)
}

/// Service seeded with "Test" (active) and "Test 2" (inactive).
fn seeded_service() -> SiteService {
    let service = create_test_service();
    service
        .create_site(SitePayload::new("Test", &["test.com"], &["test"]))
        .expect("failed to seed first site");
    service
        .create_site(SitePayload::new("Test 2", &["test2.com"], &["test2"]).with_active(false))
        .expect("failed to seed second site");
    service
}

fn base_payload() -> SitePayload {
    SitePayload::new("New Site", &["newsite.com"], &["newsite"])
}

fn count(service: &SiteService, table: &str) -> i64 {
    service
        .database()
        .connection()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .expect("failed to count rows")
}

fn violations(err: SiteError) -> Vec<Violation> {
    match err {
        SiteError::Invalid(errors) => errors.violations().to_vec(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

// --- create ---

#[test]
fn create_site_defaults_to_active() {
    let service = seeded_service();

    let site = service.create_site(base_payload()).expect("create should succeed");

    assert_eq!(site.id, SiteId::new(3));
    assert_eq!(site.name, "New Site");
    assert!(site.active);
    assert_eq!(site.descriptions(TagKind::Url), vec!["newsite.com"]);
    assert_eq!(site.descriptions(TagKind::Category), vec!["newsite"]);
}

#[test]
fn create_site_honours_inactive_flag() {
    let service = seeded_service();

    let site = service
        .create_site(base_payload().with_active(false))
        .expect("create should succeed");

    let stored = service.get_site(site.id).unwrap();
    assert!(!stored.active);
}

#[test]
fn create_site_keeps_request_order_of_tags() {
    let service = create_test_service();

    let site = service
        .create_site(SitePayload::new(
            "New Site",
            &["newsite.com", "newsite.com/new", "a.com"],
            &["newsite", "newsite2"],
        ))
        .unwrap();

    assert_eq!(
        site.descriptions(TagKind::Url),
        vec!["newsite.com", "newsite.com/new", "a.com"]
    );
    assert_eq!(
        site.descriptions(TagKind::Category),
        vec!["newsite", "newsite2"]
    );
}

#[test]
fn create_site_attaches_repeated_description_once() {
    let service = create_test_service();

    let site = service
        .create_site(SitePayload::new(
            "New Site",
            &["b.com", "a.com", "b.com"],
            &["x"],
        ))
        .unwrap();

    assert_eq!(site.descriptions(TagKind::Url), vec!["b.com", "a.com"]);
    assert_eq!(count(&service, "url_tags"), 2);
    assert_eq!(count(&service, "site_urls"), 2);
}

#[test]
fn create_site_creates_new_tags() {
    let service = seeded_service();
    assert_eq!(count(&service, "url_tags"), 2);
    assert_eq!(count(&service, "category_tags"), 2);

    service.create_site(base_payload()).unwrap();

    assert_eq!(count(&service, "url_tags"), 3);
    assert_eq!(count(&service, "category_tags"), 3);
}

#[test]
fn create_site_reuses_existing_tags() {
    let service = seeded_service();

    let site = service
        .create_site(SitePayload::new("New Site", &["test.com"], &["test"]))
        .unwrap();

    assert_eq!(count(&service, "url_tags"), 2);
    assert_eq!(count(&service, "category_tags"), 2);

    let first = service.get_site(SiteId::new(1)).unwrap();
    assert_eq!(site.urls[0].id(), first.urls[0].id());
    assert_eq!(site.categories[0].id(), first.categories[0].id());
}

#[test]
fn create_site_with_existing_name_conflicts_and_writes_nothing() {
    let service = seeded_service();

    let err = service
        .create_site(SitePayload::new("Test", &["other.com"], &["other"]))
        .unwrap_err();

    assert_eq!(violations(err), vec![Violation::Conflict]);
    assert_eq!(count(&service, "sites"), 2);
    assert_eq!(count(&service, "url_tags"), 2);
}

#[test]
fn create_site_name_check_is_case_sensitive() {
    let service = seeded_service();

    let site = service
        .create_site(SitePayload::new("test", &["test.com"], &["test"]))
        .expect("names differing in case are distinct");

    assert_eq!(site.name, "test");
}

#[test]
fn create_site_with_empty_payload_reports_all_missing_fields() {
    let service = seeded_service();

    let err = service.create_site(SitePayload::default()).unwrap_err();

    assert_eq!(
        violations(err),
        vec![
            Violation::MissingField(Field::Name),
            Violation::MissingField(Field::List(TagKind::Url)),
            Violation::MissingField(Field::List(TagKind::Category)),
        ]
    );
    assert_eq!(count(&service, "sites"), 2);
}

#[test]
fn create_site_with_both_lists_empty_reports_both_and_persists_nothing() {
    let service = seeded_service();

    let err = service
        .create_site(SitePayload::new("New Site", &[], &[]))
        .unwrap_err();

    assert_eq!(
        violations(err),
        vec![
            Violation::EmptyList(TagKind::Url),
            Violation::EmptyList(TagKind::Category),
        ]
    );
    assert_eq!(count(&service, "sites"), 2);
    assert_eq!(
        service
            .database()
            .connection()
            .query_row("SELECT COUNT(*) FROM sites WHERE name = 'New Site'", [], |row| {
                row.get::<_, i64>(0)
            })
            .unwrap(),
        0
    );
}

#[test]
fn create_site_with_empty_url_list_is_rejected() {
    let service = seeded_service();

    let err = service
        .create_site(SitePayload::new("New Site", &[], &["newsite"]))
        .unwrap_err();

    assert_eq!(violations(err), vec![Violation::EmptyList(TagKind::Url)]);
    assert_eq!(count(&service, "category_tags"), 2);
}

#[test]
fn create_site_rejects_item_without_description() {
    let service = seeded_service();
    let mut payload = base_payload();
    payload.category = Some(vec![TagPayload::default()]);

    let err = service.create_site(payload).unwrap_err();

    assert_eq!(
        violations(err),
        vec![Violation::MissingField(Field::Description {
            kind: TagKind::Category,
            index: 0
        })]
    );
}

// --- read / delete ---

#[test]
fn list_sites_returns_creation_order() {
    let service = seeded_service();

    let sites = service.list_sites().unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].name, "Test");
    assert!(sites[0].active);
    assert_eq!(sites[0].descriptions(TagKind::Url), vec!["test.com"]);
    assert_eq!(sites[1].name, "Test 2");
    assert!(!sites[1].active);
    assert_eq!(sites[1].descriptions(TagKind::Category), vec!["test2"]);
}

#[test]
fn get_site_returns_not_found_for_unknown_id() {
    let service = seeded_service();

    let err = service.get_site(SiteId::new(5)).unwrap_err();

    assert!(matches!(err, SiteError::NotFound(id) if id == SiteId::new(5)));
}

#[test]
fn delete_site_removes_only_that_site() {
    let service = seeded_service();

    service.delete_site(SiteId::new(1)).unwrap();

    let sites = service.list_sites().unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "Test 2");
    assert_eq!(count(&service, "url_tags"), 2, "tags outlive their sites");
}

#[test]
fn delete_site_unknown_id_leaves_store_unchanged() {
    let service = seeded_service();

    let err = service.delete_site(SiteId::new(100)).unwrap_err();

    assert!(matches!(err, SiteError::NotFound(_)));
    assert_eq!(count(&service, "sites"), 2);
}

// --- update ---

#[test]
fn update_site_replaces_name_and_tags() {
    let service = seeded_service();

    let site = service.update_site(SiteId::new(1), base_payload()).unwrap();

    assert_eq!(site.id, SiteId::new(1));
    assert_eq!(site.name, "New Site");
    assert!(site.active, "omitted active leaves flag unchanged");
    assert_eq!(site.descriptions(TagKind::Url), vec!["newsite.com"]);
    assert_eq!(site.descriptions(TagKind::Category), vec!["newsite"]);
}

#[test]
fn update_site_sets_inactive() {
    let service = seeded_service();

    let site = service
        .update_site(SiteId::new(1), base_payload().with_active(false))
        .unwrap();

    assert!(!site.active);
}

#[test]
fn update_site_without_active_keeps_inactive_site_inactive() {
    let service = seeded_service();

    let site = service.update_site(SiteId::new(2), base_payload()).unwrap();

    assert!(!site.active);
}

#[test]
fn update_site_to_own_name_is_not_a_conflict() {
    let service = seeded_service();

    let site = service
        .update_site(
            SiteId::new(1),
            SitePayload::new("Test", &["newsite.com"], &["newsite"]),
        )
        .unwrap();

    assert_eq!(site.name, "Test");
    assert_eq!(site.descriptions(TagKind::Url), vec!["newsite.com"]);
}

#[test]
fn update_site_to_other_sites_name_conflicts_and_keeps_tags() {
    let service = seeded_service();

    let err = service
        .update_site(
            SiteId::new(1),
            SitePayload::new("Test 2", &["newsite.com"], &["newsite"]),
        )
        .unwrap_err();

    assert_eq!(violations(err), vec![Violation::Conflict]);
    let site = service.get_site(SiteId::new(1)).unwrap();
    assert_eq!(site.name, "Test");
    assert_eq!(site.descriptions(TagKind::Url), vec!["test.com"]);
    assert_eq!(count(&service, "url_tags"), 2);
}

#[test]
fn update_site_with_empty_category_commits_nothing() {
    let service = seeded_service();

    let err = service
        .update_site(SiteId::new(1), SitePayload::new("Renamed", &["x.com"], &[]))
        .unwrap_err();

    assert_eq!(violations(err), vec![Violation::EmptyList(TagKind::Category)]);
    let site = service.get_site(SiteId::new(1)).unwrap();
    assert_eq!(site.name, "Test");
    assert_eq!(site.descriptions(TagKind::Url), vec!["test.com"]);
    assert_eq!(count(&service, "url_tags"), 2);
}

#[test]
fn update_site_unknown_id_is_not_found_even_with_invalid_payload() {
    let service = seeded_service();

    let err = service
        .update_site(SiteId::new(42), SitePayload::default())
        .unwrap_err();

    assert!(matches!(err, SiteError::NotFound(_)));
}

#[test]
fn update_site_reuses_existing_tags() {
    let service = seeded_service();

    service
        .update_site(
            SiteId::new(1),
            SitePayload::new("New Site", &["test2.com"], &["test2"]),
        )
        .unwrap();

    assert_eq!(count(&service, "url_tags"), 2);
    assert_eq!(count(&service, "category_tags"), 2);
    assert_eq!(count(&service, "site_urls"), 2);
}

#[test]
fn update_site_bumps_updated_at_only() {
    let service = seeded_service();
    let before = service.get_site(SiteId::new(1)).unwrap();

    let after = service.update_site(SiteId::new(1), base_payload()).unwrap();

    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
}
