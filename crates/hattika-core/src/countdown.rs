//! Countdown arithmetic and rendering.
//!
//! The remaining time is clamped at zero, so once the launch date passes
//! every field reads `00` and stays there while ticks keep firing.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{ids, Document};
use crate::error::Result;
use crate::launch::{LaunchDate, LaunchDateStore};
use crate::storage::KvStore;

pub const MS_PER_DAY: u64 = 86_400_000;
pub const MS_PER_HOUR: u64 = 3_600_000;
pub const MS_PER_MINUTE: u64 = 60_000;
pub const MS_PER_SECOND: u64 = 1_000;

/// Time left until launch, split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Countdown {
    Remaining {
        days: u64,
        hours: u64,
        minutes: u64,
        seconds: u64,
    },
    /// The launch date could not be interpreted.
    Invalid,
}

impl Countdown {
    /// Split a non-negative millisecond difference.
    pub fn from_millis(diff_ms: u64) -> Self {
        Countdown::Remaining {
            days: diff_ms / MS_PER_DAY,
            hours: (diff_ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (diff_ms % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (diff_ms % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    pub fn between(target: &LaunchDate, now: DateTime<Utc>) -> Self {
        match target.instant() {
            Some(at) => Self::from_millis(diff_millis(at, now)),
            None => Countdown::Invalid,
        }
    }

    /// True once every field reads zero.
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            Countdown::Remaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        )
    }

    /// Display strings for days, hours, minutes, seconds.
    pub fn fields(&self) -> [String; 4] {
        match *self {
            Countdown::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => [pad(days), pad(hours), pad(minutes), pad(seconds)],
            Countdown::Invalid => std::array::from_fn(|_| "NaN".to_string()),
        }
    }

    /// Write the four fields into the countdown slots that exist.
    pub fn render(&self, doc: &mut Document) {
        for (slot, value) in ids::COUNTDOWN_SLOTS.into_iter().zip(self.fields()) {
            doc.set_text(slot, value);
        }
    }
}

/// `max(target - now, 0)` in whole milliseconds.
pub fn diff_millis(target: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let diff = target.timestamp_millis().saturating_sub(now.timestamp_millis());
    u64::try_from(diff).unwrap_or(0)
}

/// Milliseconds as a `Duration`, saturating instead of panicking.
pub(crate) fn saturating_millis(ms: u64) -> Duration {
    Duration::try_milliseconds(i64::try_from(ms).unwrap_or(i64::MAX)).unwrap_or(Duration::MAX)
}

/// Zero-pad to at least two digits. Wider values are left intact.
pub fn pad(n: u64) -> String {
    format!("{n:02}")
}

/// Resolve the launch date and render the countdown into `doc`.
///
/// # Errors
/// Returns storage failures from resolving the launch date.
pub fn update_countdown<S: KvStore>(
    doc: &mut Document,
    launch: &mut LaunchDateStore<S>,
    now: DateTime<Utc>,
) -> Result<Countdown> {
    let target = launch.get_launch_date(now)?;
    let countdown = Countdown::between(&target, now);
    countdown.render(doc);
    tracing::debug!(?countdown, "countdown updated");
    Ok(countdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn fields(c: Countdown) -> [String; 4] {
        c.fields()
    }

    #[test]
    fn zero_diff_renders_all_zeros() {
        assert_eq!(fields(Countdown::from_millis(0)), ["00", "00", "00", "00"]);
        assert!(Countdown::from_millis(0).is_finished());
    }

    #[test]
    fn one_day_two_hours_three_minutes_four_seconds() {
        let now = Utc::now();
        let target = now
            + Duration::days(1)
            + Duration::hours(2)
            + Duration::minutes(3)
            + Duration::seconds(4);
        let c = Countdown::between(&LaunchDate::from(target), now);
        assert_eq!(fields(c), ["01", "02", "03", "04"]);
    }

    #[test]
    fn past_target_is_clamped_to_zero() {
        let now = Utc::now();
        let c = Countdown::between(&LaunchDate::from(now - Duration::hours(5)), now);
        assert_eq!(fields(c), ["00", "00", "00", "00"]);
    }

    #[test]
    fn sub_second_remainder_is_floored() {
        assert_eq!(fields(Countdown::from_millis(1_999)), ["00", "00", "00", "01"]);
        assert_eq!(fields(Countdown::from_millis(999)), ["00", "00", "00", "00"]);
        assert!(Countdown::from_millis(999).is_finished());
    }

    #[test]
    fn large_day_counts_are_not_truncated() {
        let c = Countdown::from_millis(123 * MS_PER_DAY + 5 * MS_PER_SECOND);
        assert_eq!(fields(c), ["123", "00", "00", "05"]);
    }

    #[test]
    fn invalid_target_renders_nan() {
        let target = LaunchDate::Invalid { raw: "garbage".into() };
        let c = Countdown::between(&target, Utc::now());
        assert_eq!(c, Countdown::Invalid);
        assert_eq!(fields(c), ["NaN", "NaN", "NaN", "NaN"]);
    }

    #[test]
    fn render_skips_missing_slots() {
        let mut doc = Document::new()
            .with(ids::CD_DAYS, Element::new())
            .with(ids::CD_SECONDS, Element::new());
        Countdown::from_millis(2 * MS_PER_DAY + 9 * MS_PER_SECOND).render(&mut doc);
        assert_eq!(doc.text(ids::CD_DAYS), Some("02"));
        assert_eq!(doc.text(ids::CD_SECONDS), Some("09"));
        assert!(doc.get(ids::CD_HOURS).is_none());
        assert!(doc.get(ids::CD_MINUTES).is_none());
    }

    #[test]
    fn update_countdown_creates_and_renders() {
        let mut doc = Document::landing();
        let mut launch = LaunchDateStore::new(MemoryStore::new(), 90);
        let now = Utc::now();
        let c = update_countdown(&mut doc, &mut launch, now).unwrap();
        match c {
            Countdown::Remaining { days, .. } => assert!((89..=90).contains(&days)),
            Countdown::Invalid => panic!("expected a valid countdown"),
        }
        assert!(launch.peek().unwrap().is_some());
        assert_ne!(doc.text(ids::CD_DAYS), Some("--"));
    }

    #[test]
    fn pad_behaviour() {
        assert_eq!(pad(0), "00");
        assert_eq!(pad(7), "07");
        assert_eq!(pad(42), "42");
        assert_eq!(pad(100), "100");
    }

    proptest! {
        #[test]
        fn decomposition_recomposes_to_whole_seconds(diff in 0u64..(10_000 * MS_PER_DAY)) {
            match Countdown::from_millis(diff) {
                Countdown::Remaining { days, hours, minutes, seconds } => {
                    prop_assert!(hours < 24);
                    prop_assert!(minutes < 60);
                    prop_assert!(seconds < 60);
                    let recomposed = days * MS_PER_DAY
                        + hours * MS_PER_HOUR
                        + minutes * MS_PER_MINUTE
                        + seconds * MS_PER_SECOND;
                    prop_assert_eq!(recomposed, diff - diff % MS_PER_SECOND);
                }
                Countdown::Invalid => prop_assert!(false, "numeric diff never yields Invalid"),
            }
        }

        #[test]
        fn fields_are_at_least_two_digits(diff in 0u64..(1_000 * MS_PER_DAY)) {
            for field in Countdown::from_millis(diff).fields() {
                prop_assert!(field.len() >= 2);
                prop_assert!(field.chars().all(|c| c.is_ascii_digit()));
            }
        }

        #[test]
        fn past_targets_always_clamp(back_ms in 0i64..1_000_000_000_000) {
            let now = Utc::now();
            let target = now - Duration::milliseconds(back_ms);
            prop_assert!(Countdown::between(&LaunchDate::from(target), now).is_finished());
        }
    }
}
