//! # Hattika Core Library
//!
//! Behaviour behind the Hattika "coming soon" landing page, modelled without
//! a browser so it can be driven from a CLI or tests.
//!
//! ## Architecture
//!
//! - **Launch date**: a target instant created once (today + 90 days at
//!   local midnight) and persisted in a key-value store
//! - **Countdown**: clamped days/hours/minutes/seconds written into four
//!   page slots on a one-second interval
//! - **Signup form**: local email validation acknowledged with a toast
//! - **Reveal / footer**: one-shot page mutations
//! - **Page context**: owns the document, storage and timers; every operation
//!   takes the current time explicitly
//!
//! ## Key Components
//!
//! - [`PageContext`]: startup context and timer owner
//! - [`LaunchDateStore`]: launch date resolution and persistence
//! - [`Database`]: SQLite key-value storage
//! - [`Config`]: application configuration management

pub mod countdown;
pub mod document;
pub mod error;
pub mod footer;
pub mod launch;
pub mod notify;
pub mod page;
pub mod reveal;
pub mod storage;

pub use countdown::{update_countdown, Countdown};
pub use document::{Document, Element};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use launch::{LaunchDate, LaunchDateStore, LAUNCH_DATE_KEY};
pub use notify::{is_valid_email, NotifyForm, SubmitOutcome};
pub use page::{PageContext, PageSnapshot};
pub use reveal::{IntersectionEntry, RevealObserver};
pub use storage::{Config, Database, KvStore, MemoryStore};
