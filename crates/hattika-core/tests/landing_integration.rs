//! Integration tests for a full landing page lifecycle on real storage.

use chrono::{DateTime, Duration, Utc};
use hattika_core::document::ids;
use hattika_core::{
    Config, Database, Document, IntersectionEntry, KvStore, LaunchDate, PageContext, SubmitOutcome,
    LAUNCH_DATE_KEY,
};

fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[test]
fn test_launch_date_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hattika.db");
    let now = Utc::now();

    let first = {
        let mut page = PageContext::new(Document::landing(), Database::open_at(&path).unwrap(), Config::default());
        page.boot(now).unwrap();
        page.shutdown();
        page.launch().peek().unwrap().expect("launch date written on boot")
    };

    // A later visit must count down to the same instant.
    let mut page = PageContext::new(Document::landing(), Database::open_at(&path).unwrap(), Config::default());
    page.boot(now + Duration::days(10)).unwrap();
    let second = page.launch().peek().unwrap().unwrap();
    assert_eq!(first, second);
    assert!(matches!(second, LaunchDate::At { .. }));
}

#[test]
fn test_full_page_session() {
    let mut db = Database::open_memory().unwrap();
    db.set(LAUNCH_DATE_KEY, "2026-10-20T00:00:00.000Z").unwrap();
    let mut page = PageContext::new(Document::landing(), db, Config::default());

    let now = utc("2026-10-18T12:00:00Z");
    page.boot(now).unwrap();
    assert_eq!(page.document().text(ids::CD_DAYS), Some("01"));
    assert_eq!(page.document().text(ids::CD_HOURS), Some("12"));

    // Visitor signs up.
    page.type_email("visitor@hattika.example");
    let outcome = page.submit_notify(now);
    assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    assert_eq!(page.document().get(ids::NOTIFY_EMAIL).unwrap().value, "");

    // Scrolls the features section into view.
    let revealed = page.intersect(&[
        IntersectionEntry::new("features", 0.3),
        IntersectionEntry::new("faq", 0.05),
    ]);
    assert_eq!(revealed, vec!["features"]);

    // Five seconds later: countdown moved, toast gone.
    page.advance_to(now + Duration::seconds(5)).unwrap();
    assert_eq!(page.document().text(ids::CD_SECONDS), Some("55"));
    let toast = page.document().get(ids::NOTIFY_TOAST).unwrap();
    assert_eq!(toast.style("opacity"), Some("0"));

    let snapshot = page.snapshot().unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["launch_date"]["kind"], "at");
    assert_eq!(json["countdown"]["days"], 1);

    page.shutdown();
    assert!(!page.is_running());
}

#[test]
fn test_past_launch_and_corrupt_storage() {
    let mut db = Database::open_memory().unwrap();
    db.set(LAUNCH_DATE_KEY, "2020-01-01T00:00:00.000Z").unwrap();
    let mut page = PageContext::new(Document::landing(), db, Config::default());
    page.boot(Utc::now()).unwrap();
    for id in ids::COUNTDOWN_SLOTS {
        assert_eq!(page.document().text(id), Some("00"));
    }

    let mut db = page.into_store();
    db.set(LAUNCH_DATE_KEY, "launch-day").unwrap();
    let mut page = PageContext::new(Document::landing(), db, Config::default());
    page.boot(Utc::now()).unwrap();
    for id in ids::COUNTDOWN_SLOTS {
        assert_eq!(page.document().text(id), Some("NaN"));
    }
}
