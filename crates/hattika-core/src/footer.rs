use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

use crate::document::{ids, Document};

/// Write `now`'s local calendar year into the footer, if the page has one.
pub fn stamp_year(doc: &mut Document, now: DateTime<Utc>) -> bool {
    stamp_year_in(doc, &now.with_timezone(&Local))
}

pub fn stamp_year_in<Tz: TimeZone>(doc: &mut Document, now: &DateTime<Tz>) -> bool {
    doc.set_text(ids::YEAR, now.year().to_string())
}
