//! Page context.
//!
//! Built once at startup and handed to every behavior. It owns the document,
//! the launch-date store and all pending timers, so a page can be booted,
//! driven with an injected clock and shut down deterministically.
//!
//! ## Lifecycle
//!
//! ```text
//! new -> boot -> (advance_to | submit_notify | intersect)* -> shutdown
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::countdown::{saturating_millis, update_countdown, Countdown};
use crate::document::{ids, Document};
use crate::error::Result;
use crate::footer::stamp_year;
use crate::launch::{LaunchDate, LaunchDateStore};
use crate::notify::{hide_toast, NotifyForm, SubmitOutcome};
use crate::reveal::{IntersectionEntry, RevealObserver};
use crate::storage::{Config, KvStore};

/// Repeating countdown timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    period: Duration,
    next_due: DateTime<Utc>,
}

/// Every timer the page has armed.
#[derive(Debug, Clone, Default)]
struct Timers {
    countdown: Option<Interval>,
    /// Pending toast fades, in scheduling order.
    toast_hides: Vec<DateTime<Utc>>,
}

fn later(at: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    at.checked_add_signed(by).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Serializable view of a page, for snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub launch_date: Option<LaunchDate>,
    pub countdown: Option<Countdown>,
    pub document: Document,
}

pub struct PageContext<S> {
    document: Document,
    launch: LaunchDateStore<S>,
    config: Config,
    form: NotifyForm,
    reveal: Option<RevealObserver>,
    timers: Timers,
    countdown: Option<Countdown>,
}

impl<S: KvStore> PageContext<S> {
    pub fn new(document: Document, store: S, config: Config) -> Self {
        Self {
            document,
            launch: LaunchDateStore::new(store, config.countdown.lead_days),
            form: NotifyForm::new(config.notify.clone()),
            config,
            reveal: None,
            timers: Timers::default(),
            countdown: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn launch(&self) -> &LaunchDateStore<S> {
        &self.launch
    }

    /// Last countdown rendered, if any.
    pub fn countdown(&self) -> Option<Countdown> {
        self.countdown
    }

    /// Whether the countdown interval is armed.
    pub fn is_running(&self) -> bool {
        self.timers.countdown.is_some()
    }

    pub fn pending_toast_hides(&self) -> usize {
        self.timers.toast_hides.len()
    }

    pub fn reveal(&self) -> Option<&RevealObserver> {
        self.reveal.as_ref()
    }

    /// Snapshot of the launch date, countdown and document.
    ///
    /// # Errors
    /// Returns storage failures from reading the launch date.
    pub fn snapshot(&self) -> Result<PageSnapshot> {
        Ok(PageSnapshot {
            launch_date: self.launch.peek()?,
            countdown: self.countdown,
            document: self.document.clone(),
        })
    }

    pub fn into_store(self) -> S {
        self.launch.into_inner()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Render the countdown, arm its interval, start observing reveal
    /// targets and stamp the footer year.
    ///
    /// # Errors
    /// Returns storage failures from resolving the launch date.
    pub fn boot(&mut self, now: DateTime<Utc>) -> Result<Countdown> {
        let countdown = self.tick(now)?;

        let period = saturating_millis(self.config.countdown.tick_interval_ms);
        self.timers.countdown = Some(Interval {
            period,
            next_due: later(now, period),
        });

        if self.config.reveal.enabled {
            let mut observer = RevealObserver::new(self.config.reveal.threshold);
            let watched = observer.observe_all(&self.document);
            tracing::debug!(watched, "reveal observer armed");
            self.reveal = Some(observer);
        }

        stamp_year(&mut self.document, now);
        tracing::debug!(period_ms = period.num_milliseconds(), "page booted");
        Ok(countdown)
    }

    /// Re-render the countdown for `now`.
    ///
    /// # Errors
    /// Returns storage failures from resolving the launch date.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Countdown> {
        let countdown = update_countdown(&mut self.document, &mut self.launch, now)?;
        self.countdown = Some(countdown);
        Ok(countdown)
    }

    /// Fire every timer due at or before `now`. Returns how many fired.
    ///
    /// Missed countdown ticks are coalesced: the countdown renders once,
    /// for the latest missed tick.
    ///
    /// # Errors
    /// Returns storage failures from resolving the launch date.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let mut fired = 0;

        if let Some(interval) = self.timers.countdown {
            if interval.next_due <= now {
                let behind = (now - interval.next_due).num_milliseconds();
                let period_ms = interval.period.num_milliseconds().max(1);
                let fire_at = later(
                    interval.next_due,
                    Duration::milliseconds(behind - behind % period_ms),
                );
                self.tick(fire_at)?;
                self.timers.countdown = Some(Interval {
                    period: interval.period,
                    next_due: later(fire_at, interval.period),
                });
                fired += 1;
            }
        }

        let before = self.timers.toast_hides.len();
        self.timers.toast_hides.retain(|due| *due > now);
        let due_hides = before - self.timers.toast_hides.len();
        for _ in 0..due_hides {
            hide_toast(&mut self.document);
        }
        fired += due_hides;

        Ok(fired)
    }

    /// Put text into the email input, as a user typing would.
    pub fn type_email(&mut self, value: &str) -> bool {
        match self.document.get_mut(ids::NOTIFY_EMAIL) {
            Some(input) => {
                input.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Submit the signup form and schedule the toast fade.
    pub fn submit_notify(&mut self, now: DateTime<Utc>) -> SubmitOutcome {
        let submission = self.form.submit(&mut self.document, now);
        if let Some(hide_at) = submission.toast_hide_at {
            self.timers.toast_hides.push(hide_at);
        }
        submission.outcome
    }

    /// Deliver visibility reports. Returns the ids revealed.
    pub fn intersect(&mut self, entries: &[IntersectionEntry]) -> Vec<String> {
        match self.reveal.as_mut() {
            Some(observer) => observer.on_intersections(&mut self.document, entries),
            None => Vec::new(),
        }
    }

    /// Cancel every timer. The document keeps its last rendered state.
    pub fn shutdown(&mut self) {
        self.timers = Timers::default();
        tracing::debug!("page timers cancelled");
    }
}
