//! Lessons

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Opaque, stable lesson identifier as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Create a lesson id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LessonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LessonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A bookable lesson with a finite number of seats.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonRecord {
    /// Lesson id
    pub id: LessonId,

    /// Subject taught, e.g. "Math"
    pub subject: String,

    /// Where the lesson takes place
    pub location: String,

    /// Price of a single seat
    pub price: Money<'static, Currency>,

    /// Seats that can still be reserved from this client
    pub spaces: u32,

    /// Seats reported by the backend on the last reload
    pub capacity: u32,
}

impl LessonRecord {
    /// Creates a lesson whose capacity equals its currently available spaces.
    pub fn new(
        id: impl Into<LessonId>,
        subject: impl Into<String>,
        location: impl Into<String>,
        price: Money<'static, Currency>,
        spaces: u32,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            location: location.into(),
            price,
            spaces,
            capacity: spaces,
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn new_lesson_capacity_matches_spaces() {
        let lesson = LessonRecord::new("m1", "Math", "London", Money::from_minor(2000, GBP), 5);

        assert_eq!(lesson.spaces, 5);
        assert_eq!(lesson.capacity, 5);
        assert_eq!(lesson.id.as_str(), "m1");
    }

    #[test]
    fn lesson_id_displays_raw_value() {
        assert_eq!(LessonId::from("abc123").to_string(), "abc123");
    }
}
