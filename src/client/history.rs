//! Navigation history.
//!
//! Each entry keeps the full page object so going back restores the view
//! without a request, the way browser history state does.

use crate::inertia::PageObject;

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<PageObject>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: PageObject) {
        self.entries.push(page);
    }

    /// Replace the current entry, or push when empty.
    pub fn replace(&mut self, page: PageObject) {
        match self.entries.last_mut() {
            Some(current) => *current = page,
            None => self.entries.push(page),
        }
    }

    /// Drop the current entry and return the one before it.
    pub fn back(&mut self) -> Option<&PageObject> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.entries.last()
    }

    pub fn current(&self) -> Option<&PageObject> {
        self.entries.last()
    }

    pub fn urls(&self) -> Vec<&str> {
        self.entries.iter().map(|p| p.url.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
