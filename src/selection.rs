//! Selections
//!
//! Quantities a user has staged for a lesson but not yet committed to the cart. Staging never
//! touches the catalog's seat counts.

use rustc_hash::FxHashMap;

use crate::{catalog::Catalog, lessons::LessonId};

/// Selection Tracker
#[derive(Debug, Default, Clone)]
pub struct Selections {
    staged: FxHashMap<LessonId, u32>,
}

impl Selections {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Staged quantity for a lesson, 0 when nothing is staged.
    pub fn get_staged(&self, lesson: &LessonId) -> u32 {
        self.staged.get(lesson).copied().unwrap_or(0)
    }

    /// Stage one more seat, unless that would exceed the lesson's available spaces.
    ///
    /// Returns the staged quantity after the call.
    pub fn increase(&mut self, catalog: &Catalog, lesson: &LessonId) -> u32 {
        let current = self.get_staged(lesson);

        if current < catalog.spaces(lesson) {
            self.staged.insert(lesson.clone(), current + 1);

            return current + 1;
        }

        current
    }

    /// Unstage one seat, floored at zero.
    ///
    /// Returns the staged quantity after the call.
    pub fn decrease(&mut self, lesson: &LessonId) -> u32 {
        let current = self.get_staged(lesson);

        if current > 0 {
            self.staged.insert(lesson.clone(), current - 1);
        }

        current.saturating_sub(1)
    }

    /// Reset a lesson's staged quantity to zero.
    pub fn clear(&mut self, lesson: &LessonId) {
        self.staged.remove(lesson);
    }

    /// Reset every staged quantity.
    pub fn clear_all(&mut self) {
        self.staged.clear();
    }
}
