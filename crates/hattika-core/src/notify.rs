//! "Notify me" signup form.
//!
//! Validation is purely local: an accepted address is acknowledged with a
//! toast and the input is cleared. Nothing is sent anywhere.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::countdown::saturating_millis;
use crate::document::{ids, Document};
use crate::storage::NotifyConfig;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        // Any run of characters that are neither `@` nor browser whitespace.
        let part = r"[^@\t\n\x0B\x0C\r\p{Zs}\x{2028}\x{2029}\x{FEFF}]+";
        Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern compiles")
    })
}

/// Whitespace as browsers count it: the byte order mark is in, NEL is out.
fn is_blank(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// `local@domain.tld` shape check. Deliberately permissive: consecutive
/// dots and made-up domains pass.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// What a submit did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Accepted { email: String },
    Rejected { input: String },
    /// The page has no signup form, so the submit was never wired.
    NoForm,
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }
}

/// Result of a submit, plus when the toast it raised should fade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub outcome: SubmitOutcome,
    pub toast_hide_at: Option<DateTime<Utc>>,
}

/// Handles submits of the signup form.
#[derive(Debug, Clone)]
pub struct NotifyForm {
    config: NotifyConfig,
}

impl NotifyForm {
    pub fn new(config: NotifyConfig) -> Self {
        Self { config }
    }

    /// Validate the email input and acknowledge it with a toast.
    pub fn submit(&self, doc: &mut Document, now: DateTime<Utc>) -> Submission {
        if !doc.contains(ids::NOTIFY_FORM) {
            return Submission {
                outcome: SubmitOutcome::NoForm,
                toast_hide_at: None,
            };
        }

        let email = doc
            .get(ids::NOTIFY_EMAIL)
            .map(|input| input.value.trim_matches(is_blank).to_string())
            .unwrap_or_default();

        if !is_valid_email(&email) {
            tracing::info!("signup rejected: malformed address");
            let toast_hide_at = self.show_toast(doc, now, true);
            return Submission {
                outcome: SubmitOutcome::Rejected { input: email },
                toast_hide_at,
            };
        }

        tracing::info!("signup accepted");
        let toast_hide_at = self.show_toast(doc, now, false);
        if let Some(input) = doc.get_mut(ids::NOTIFY_EMAIL) {
            input.value.clear();
        }
        Submission {
            outcome: SubmitOutcome::Accepted { email },
            toast_hide_at,
        }
    }

    /// Returns the fade deadline, or `None` when there is no toast element.
    fn show_toast(&self, doc: &mut Document, now: DateTime<Utc>, is_error: bool) -> Option<DateTime<Utc>> {
        let toast = doc.get_mut(ids::NOTIFY_TOAST)?;
        let (message, color) = if is_error {
            (&self.config.error_message, &self.config.error_color)
        } else {
            (&self.config.success_message, &self.config.success_color)
        };
        toast.text = message.clone();
        toast.set_style("color", color.as_str());
        toast.set_style("opacity", "1");

        let duration = saturating_millis(self.config.toast_duration_ms);
        Some(now.checked_add_signed(duration).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }
}

/// Fade the toast out. Its text stays in place.
pub fn hide_toast(doc: &mut Document) -> bool {
    match doc.get_mut(ids::NOTIFY_TOAST) {
        Some(toast) => {
            toast.set_style("opacity", "0");
            true
        }
        None => false,
    }
}
