//! Element access used by the renderer.
//!
//! The renderer never touches a concrete document. It looks elements up by id
//! and writes their text through [`DisplaySurface`], so the same code drives
//! the SVG card and the in-memory document used in tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

pub trait DisplaySurface: Send + Sync {
    /// Current text of the element with `id`, or `None` if there is no such element.
    fn get_by_id(&self, id: &str) -> Option<String>;

    /// Replace the element's text. Unknown ids are ignored.
    fn set_text(&self, id: &str, text: &str);

    /// Whether an element carrying `class` exists.
    fn contains_region(&self, _class: &str) -> bool {
        true
    }
}

/// In-memory document: a set of elements with text, plus region classes.
#[derive(Debug, Default)]
pub struct MemoryDom {
    elements: Mutex<BTreeMap<String, String>>,
    regions: BTreeSet<String>,
}

impl MemoryDom {
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            elements: Mutex::new(
                ids.into_iter()
                    .map(|id| (id.to_string(), String::new()))
                    .collect(),
            ),
            regions: BTreeSet::new(),
        }
    }

    pub fn with_region(mut self, class: &str) -> Self {
        self.regions.insert(class.to_string());
        self
    }

    /// Snapshot of every element's text.
    pub fn texts(&self) -> BTreeMap<String, String> {
        self.elements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DisplaySurface for MemoryDom {
    fn get_by_id(&self, id: &str) -> Option<String> {
        self.elements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn set_text(&self, id: &str, text: &str) {
        let mut elements = self.elements.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = elements.get_mut(id) {
            *slot = text.to_string();
        }
    }

    fn contains_region(&self, class: &str) -> bool {
        self.regions.contains(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_text_only_touches_existing_elements() {
        let dom = MemoryDom::new(["repos"]);
        dom.set_text("repos", "7");
        dom.set_text("stars", "9");
        assert_eq!(dom.get_by_id("repos").as_deref(), Some("7"));
        assert_eq!(dom.get_by_id("stars"), None);
        assert_eq!(dom.texts().len(), 1);
    }

    #[test]
    fn regions_are_opt_in() {
        let dom = MemoryDom::new(["repos"]);
        assert!(!dom.contains_region("github-stats"));
        let dom = dom.with_region("github-stats");
        assert!(dom.contains_region("github-stats"));
    }
}
