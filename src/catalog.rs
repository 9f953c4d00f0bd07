//! Catalog
//!
//! The catalog holds the lessons as of the last successful reload, in fetch order. Seat counts
//! change only through [`Catalog::adjust_spaces`]; everything else is read-only.

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::lessons::{LessonId, LessonRecord};

/// Errors raised by catalog lookups and mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No lesson with this id is in the current catalog.
    #[error("Lesson {0} not found")]
    LessonNotFound(LessonId),
}

/// Catalog Store
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    lessons: Vec<LessonRecord>,
    index: FxHashMap<LessonId, usize>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from freshly fetched records.
    pub fn with_lessons(lessons: impl IntoIterator<Item = LessonRecord>) -> Self {
        let mut catalog = Self::new();

        catalog.replace_all(lessons);

        catalog
    }

    /// Swap out every record for a freshly fetched set.
    ///
    /// The incoming seat counts are authoritative, so each record's capacity is reset to its
    /// spaces. Duplicate ids keep their first occurrence.
    pub fn replace_all(&mut self, lessons: impl IntoIterator<Item = LessonRecord>) {
        self.lessons.clear();
        self.index.clear();

        for mut lesson in lessons {
            if self.index.contains_key(&lesson.id) {
                warn!(lesson = %lesson.id, "dropping duplicate lesson from catalog reload");
                continue;
            }

            lesson.capacity = lesson.spaces;

            self.index.insert(lesson.id.clone(), self.lessons.len());
            self.lessons.push(lesson);
        }

        debug!(lessons = self.lessons.len(), "catalog replaced");
    }

    /// Find a lesson by id.
    pub fn find_by_id(&self, id: &LessonId) -> Option<&LessonRecord> {
        self.index.get(id).and_then(|&idx| self.lessons.get(idx))
    }

    /// Available spaces for a lesson, or 0 when it is not in the catalog.
    pub fn spaces(&self, id: &LessonId) -> u32 {
        self.find_by_id(id).map_or(0, |lesson| lesson.spaces)
    }

    /// Add `delta` seats to a lesson, returning its new seat count.
    ///
    /// The count stays between zero and the lesson's capacity. An over-decrement or an
    /// over-restore is absorbed and logged.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LessonNotFound`] if the lesson is not in the catalog.
    pub fn adjust_spaces(&mut self, id: &LessonId, delta: i64) -> Result<u32, CatalogError> {
        let lesson = self
            .index
            .get(id)
            .and_then(|&idx| self.lessons.get_mut(idx))
            .ok_or_else(|| CatalogError::LessonNotFound(id.clone()))?;

        let adjusted = i64::from(lesson.spaces).saturating_add(delta);

        if adjusted < 0 {
            warn!(
                lesson = %id,
                spaces = lesson.spaces,
                delta,
                "absorbed seat over-decrement"
            );
        }

        if adjusted > i64::from(lesson.capacity) {
            warn!(
                lesson = %id,
                spaces = lesson.spaces,
                capacity = lesson.capacity,
                delta,
                "absorbed seat restore above known capacity"
            );
        }

        lesson.spaces = u32::try_from(adjusted.clamp(0, i64::from(lesson.capacity)))
            .unwrap_or(lesson.capacity);

        Ok(lesson.spaces)
    }

    /// Treat every current seat count as the new capacity.
    ///
    /// Called once reserved seats have been sold and the cart that held them is cleared.
    pub fn settle(&mut self) {
        for lesson in &mut self.lessons {
            lesson.capacity = lesson.spaces;
        }
    }

    /// Iterate over lessons in fetch order.
    pub fn records(&self) -> impl Iterator<Item = &LessonRecord> {
        self.lessons.iter()
    }

    /// Lessons in fetch order.
    pub fn as_slice(&self) -> &[LessonRecord] {
        &self.lessons
    }

    /// Number of lessons in the catalog.
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}
