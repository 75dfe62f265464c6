//! Persisted launch date.
//!
//! The first resolution writes "today + lead days at local midnight" to the
//! key-value store. Every later resolution reads that value back and never
//! recomputes it, so the countdown target is stable across runs until the
//! entry is cleared.

use chrono::{
    DateTime, Datelike, Days, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::storage::KvStore;

/// Storage key for the launch date.
pub const LAUNCH_DATE_KEY: &str = "hattika_launch_date";

/// Default lead time for a generated launch date.
pub const DEFAULT_LEAD_DAYS: u32 = 90;

/// A resolved launch date.
///
/// A stored value that does not parse is carried as `Invalid` rather than
/// rejected; downstream rendering shows it as `NaN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LaunchDate {
    At { at: DateTime<Utc> },
    Invalid { raw: String },
}

impl LaunchDate {
    /// Interpret a stored string. Never fails.
    pub fn parse(raw: &str) -> Self {
        match parse_launch_date(raw) {
            Some(at) => LaunchDate::At { at },
            None => LaunchDate::Invalid {
                raw: raw.to_string(),
            },
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            LaunchDate::At { at } => Some(*at),
            LaunchDate::Invalid { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.instant().is_some()
    }
}

impl From<DateTime<Utc>> for LaunchDate {
    fn from(at: DateTime<Utc>) -> Self {
        LaunchDate::At { at }
    }
}

/// `YYYY-MM-DDTHH:MM:SS.sssZ`, the shape the value is persisted in.
///
/// Years outside `0000..=9999` use the expanded `±YYYYYY` form so they
/// still parse back.
pub fn to_iso_string(at: DateTime<Utc>) -> String {
    let year = at.year();
    if (0..=9999).contains(&year) {
        return at.to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    let sign = if year < 0 { '-' } else { '+' };
    format!(
        "{sign}{:06}{}",
        year.unsigned_abs(),
        at.format("-%m-%dT%H:%M:%S%.3fZ")
    )
}

/// Parse a stored or user-supplied launch date, reading any value without
/// an offset as local time.
pub fn parse_launch_date(raw: &str) -> Option<DateTime<Utc>> {
    parse_launch_date_in(raw, &Local)
}

/// Accepted shapes:
/// - RFC 3339 (`2027-01-16T00:00:00.000Z`, `2027-01-16T09:00:00+09:00`)
/// - expanded years (`+010000-01-01T00:00:00.000Z`)
/// - a bare `YYYY-MM-DD`, taken as UTC midnight
/// - `YYYY-MM-DDTHH:MM[:SS[.sss]]` with no offset, taken in `tz`
pub fn parse_launch_date_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_expanded_year(raw) {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|local| resolve_local(tz, local))
}

/// `±YYYYYY-MM-DDTHH:MM:SS[.sss]Z`.
fn parse_expanded_year(raw: &str) -> Option<DateTime<Utc>> {
    let (negative, rest) = match raw.as_bytes().first()? {
        b'+' => (false, &raw[1..]),
        b'-' => (true, &raw[1..]),
        _ => return None,
    };
    let year: i32 = digits(rest.get(..6)?)?.try_into().ok()?;
    // `-000000` is not a year.
    if negative && year == 0 {
        return None;
    }
    let (date, time) = rest[6..].strip_prefix('-')?.split_once('T')?;
    let (month, day) = date.split_once('-')?;
    if month.len() != 2 || day.len() != 2 {
        return None;
    }

    let year = if negative { -year } else { year };
    let date = NaiveDate::from_ymd_opt(year, digits(month)?, digits(day)?)?;
    let time = NaiveTime::parse_from_str(time.strip_suffix('Z')?, "%H:%M:%S%.f").ok()?;
    Some(date.and_time(time).and_utc())
}

fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Place a wall-clock time in `tz`. Ambiguous times take the earlier
/// instant; times inside a DST gap move forward by an hour.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a user-supplied launch date, rejecting anything unparseable.
///
/// # Errors
/// Returns `ValidationError::InvalidLaunchDate` if `input` is not one of
/// the shapes [`parse_launch_date_in`] accepts.
pub fn parse_user_launch_date(input: &str) -> Result<DateTime<Utc>> {
    parse_launch_date(input).ok_or_else(|| {
        ValidationError::InvalidLaunchDate {
            input: input.to_string(),
        }
        .into()
    })
}

/// `now`'s calendar date in its own time zone, plus `lead_days`, at midnight.
///
/// Calendar days are added, so a DST change inside the window does not
/// shift the result off midnight. If midnight does not exist on the target
/// day, the first instant after the gap is used.
pub fn launch_date_from<Tz: TimeZone>(now: &DateTime<Tz>, lead_days: u32) -> DateTime<Utc> {
    let date = now
        .date_naive()
        .checked_add_days(Days::new(u64::from(lead_days)))
        .unwrap_or(NaiveDate::MAX);
    let midnight = date.and_time(NaiveTime::MIN);

    resolve_local(&now.timezone(), midnight).unwrap_or_else(|| midnight.and_utc())
}

/// Resolves, creates and pins the launch date in a [`KvStore`].
#[derive(Debug)]
pub struct LaunchDateStore<S> {
    store: S,
    lead_days: u32,
}

impl<S: KvStore> LaunchDateStore<S> {
    pub fn new(store: S, lead_days: u32) -> Self {
        Self { store, lead_days }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Resolve the launch date, creating it at local midnight if absent.
    ///
    /// # Errors
    /// Only storage failures are reported. A malformed stored value comes
    /// back as `LaunchDate::Invalid`.
    pub fn get_launch_date(&mut self, now: DateTime<Utc>) -> Result<LaunchDate> {
        self.get_launch_date_in(&now.with_timezone(&Local))
    }

    /// Same as [`get_launch_date`](Self::get_launch_date) with midnight
    /// taken in `now`'s time zone.
    ///
    /// # Errors
    /// Only storage failures are reported.
    pub fn get_launch_date_in<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<LaunchDate> {
        if let Some(stored) = self.peek()? {
            return Ok(stored);
        }

        let target = launch_date_from(now, self.lead_days);
        self.store.set(LAUNCH_DATE_KEY, &to_iso_string(target))?;
        tracing::info!(launch_date = %to_iso_string(target), lead_days = self.lead_days, "launch date created");
        Ok(LaunchDate::At { at: target })
    }

    /// Read the stored launch date without creating one.
    ///
    /// An empty stored string counts as absent.
    ///
    /// # Errors
    /// Returns storage failures.
    pub fn peek(&self) -> Result<Option<LaunchDate>> {
        let Some(raw) = self.store.get(LAUNCH_DATE_KEY)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }

        let parsed = LaunchDate::parse(&raw);
        if !parsed.is_valid() {
            tracing::warn!(stored = %raw, "stored launch date does not parse");
        }
        Ok(Some(parsed))
    }

    /// Pin an explicit launch date, replacing any stored value.
    ///
    /// # Errors
    /// Returns storage failures.
    pub fn set_launch_date(&mut self, at: DateTime<Utc>) -> Result<LaunchDate> {
        self.store.set(LAUNCH_DATE_KEY, &to_iso_string(at))?;
        tracing::info!(launch_date = %to_iso_string(at), "launch date pinned");
        Ok(LaunchDate::At { at })
    }

    /// Forget the stored launch date. The next resolution generates a new one.
    ///
    /// # Errors
    /// Returns storage failures.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(LAUNCH_DATE_KEY)?;
        tracing::info!("launch date cleared");
        Ok(())
    }
}
