//! Headless model of the landing page DOM.
//!
//! Elements are addressed by id. Every lookup returns `Option` so that
//! behaviors can skip writes to slots the page does not contain.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Element ids the landing page behaviors read and write.
pub mod ids {
    pub const CD_DAYS: &str = "cd-days";
    pub const CD_HOURS: &str = "cd-hours";
    pub const CD_MINUTES: &str = "cd-minutes";
    pub const CD_SECONDS: &str = "cd-seconds";
    pub const NOTIFY_FORM: &str = "notify-form";
    pub const NOTIFY_EMAIL: &str = "notify-email";
    pub const NOTIFY_TOAST: &str = "notify-toast";
    pub const YEAR: &str = "year";

    /// Countdown slots in days, hours, minutes, seconds order.
    pub const COUNTDOWN_SLOTS: [&str; 4] = [CD_DAYS, CD_HOURS, CD_MINUTES, CD_SECONDS];
}

/// A single page element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub text: String,
    /// Form control value, only meaningful for inputs.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub classes: BTreeSet<String>,
    /// Inline style properties.
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    /// Flagged for scroll reveal (`data-reveal`).
    #[serde(default)]
    pub reveal: bool,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn revealable() -> Self {
        Self {
            reveal: true,
            ..Self::default()
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Returns `true` if the class was newly added.
    pub fn add_class(&mut self, class: &str) -> bool {
        self.classes.insert(class.to_string())
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }
}

/// The page, as a set of elements keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    elements: BTreeMap<String, Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard Hattika landing page: countdown, signup form, footer
    /// and three sections flagged for reveal.
    pub fn landing() -> Self {
        let mut doc = Self::new();
        for id in ids::COUNTDOWN_SLOTS {
            doc.insert(id, Element::with_text("--"));
        }
        doc.insert(ids::NOTIFY_FORM, Element::new());
        doc.insert(ids::NOTIFY_EMAIL, Element::new());
        doc.insert(ids::NOTIFY_TOAST, Element::new());
        doc.insert(ids::YEAR, Element::new());
        for id in ["features", "story", "faq"] {
            doc.insert(id, Element::revealable());
        }
        doc
    }

    /// Insert or replace an element, builder style.
    pub fn with(mut self, id: &str, element: Element) -> Self {
        self.insert(id, element);
        self
    }

    pub fn insert(&mut self, id: &str, element: Element) -> Option<Element> {
        self.elements.insert(id.to_string(), element)
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.elements.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Text of an element, `None` if the element is absent.
    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).map(|el| el.text.as_str())
    }

    /// Write text if the element exists. Returns whether a write happened.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Ids of every element flagged for reveal, in id order.
    pub fn reveal_targets(&self) -> Vec<String> {
        self.elements
            .iter()
            .filter(|(_, el)| el.reveal)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
