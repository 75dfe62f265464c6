//! One-shot scroll reveal.
//!
//! Elements flagged `data-reveal` are observed until they are first seen at
//! or above the visibility threshold. They then gain the `revealed` class
//! and are unobserved for good.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::ValidationError;

pub const REVEALED_CLASS: &str = "revealed";
pub const DEFAULT_THRESHOLD: f64 = 0.15;

/// A visibility report for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: String,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn new(target: impl Into<String>, ratio: f64) -> Self {
        Self {
            target: target.into(),
            ratio,
        }
    }
}

/// Parses `id=ratio`, e.g. `features=0.4`.
impl FromStr for IntersectionEntry {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ValidationError::InvalidIntersection {
            input: s.to_string(),
            message: message.to_string(),
        };

        let (target, ratio) = s.split_once('=').ok_or_else(|| invalid("expected id=ratio"))?;
        let target = target.trim();
        if target.is_empty() {
            return Err(invalid("element id is empty"));
        }
        let ratio: f64 = ratio
            .trim()
            .parse()
            .map_err(|_| invalid("ratio is not a number"))?;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(invalid("ratio must be between 0 and 1"));
        }
        Ok(Self::new(target, ratio))
    }
}

/// Tracks which reveal targets are still being watched.
#[derive(Debug, Clone)]
pub struct RevealObserver {
    threshold: f64,
    observed: BTreeSet<String>,
}

impl Default for RevealObserver {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl RevealObserver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            observed: BTreeSet::new(),
        }
    }

    /// Start observing every flagged element. Returns how many are watched.
    pub fn observe_all(&mut self, doc: &Document) -> usize {
        self.observed.extend(doc.reveal_targets());
        self.observed.len()
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.observed.contains(id)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Apply visibility reports. Returns the ids revealed by this batch.
    pub fn on_intersections(&mut self, doc: &mut Document, entries: &[IntersectionEntry]) -> Vec<String> {
        let mut revealed = Vec::new();
        for entry in entries {
            if entry.ratio < self.threshold || !self.observed.contains(&entry.target) {
                continue;
            }
            if let Some(el) = doc.get_mut(&entry.target) {
                el.add_class(REVEALED_CLASS);
            }
            self.observed.remove(&entry.target);
            tracing::debug!(element = %entry.target, ratio = entry.ratio, "element revealed");
            revealed.push(entry.target.clone());
        }
        revealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Element;

    fn page() -> Document {
        Document::new()
            .with("hero", Element::new())
            .with("features", Element::revealable())
            .with("faq", Element::revealable())
    }

    #[test]
    fn observes_only_flagged_elements() {
        let mut observer = RevealObserver::default();
        assert_eq!(observer.observe_all(&page()), 2);
        assert!(observer.is_observing("features"));
        assert!(!observer.is_observing("hero"));
    }

    #[test]
    fn below_threshold_does_not_reveal() {
        let mut doc = page();
        let mut observer = RevealObserver::default();
        observer.observe_all(&doc);

        let revealed = observer.on_intersections(&mut doc, &[IntersectionEntry::new("features", 0.1)]);
        assert!(revealed.is_empty());
        assert!(!doc.get("features").unwrap().has_class(REVEALED_CLASS));
        assert!(observer.is_observing("features"));
    }

    #[test]
    fn reveals_once_then_stops_observing() {
        let mut doc = page();
        let mut observer = RevealObserver::default();
        observer.observe_all(&doc);

        let first = observer.on_intersections(&mut doc, &[IntersectionEntry::new("features", 0.15)]);
        assert_eq!(first, vec!["features"]);
        assert!(doc.get("features").unwrap().has_class(REVEALED_CLASS));
        assert!(!observer.is_observing("features"));

        let snapshot = doc.clone();
        let second = observer.on_intersections(&mut doc, &[IntersectionEntry::new("features", 1.0)]);
        assert!(second.is_empty());
        assert_eq!(doc, snapshot);
    }

    #[test]
    fn unflagged_elements_ignore_intersections() {
        let mut doc = page();
        let mut observer = RevealObserver::default();
        observer.observe_all(&doc);
        observer.on_intersections(&mut doc, &[IntersectionEntry::new("hero", 1.0)]);
        assert!(!doc.get("hero").unwrap().has_class(REVEALED_CLASS));
    }

    #[test]
    fn parses_entries() {
        let entry: IntersectionEntry = "features=0.4".parse().unwrap();
        assert_eq!(entry, IntersectionEntry::new("features", 0.4));
        assert!("features".parse::<IntersectionEntry>().is_err());
        assert!("=0.4".parse::<IntersectionEntry>().is_err());
        assert!("features=lots".parse::<IntersectionEntry>().is_err());
        assert!("features=1.5".parse::<IntersectionEntry>().is_err());
    }
}
