//! Fixtures

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{catalog::Catalog, fixtures::lessons::LessonsFixture, lessons::LessonRecord};

pub mod lessons;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between lessons
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No lessons loaded yet
    #[error("No lessons loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded lessons, in file order
    lessons: Vec<LessonRecord>,

    /// Currency for the fixture set
    currency: Option<&'static rusty_money::iso::Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            lessons: Vec::new(),
            currency: None,
        }
    }

    /// Load lessons from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_lessons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("lessons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: LessonsFixture = serde_norway::from_str(&contents)?;

        for lesson_fixture in fixture.lessons {
            let lesson = LessonRecord::try_from(lesson_fixture)?;
            let currency = lesson.price.currency();

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.lessons.push(lesson);
        }

        Ok(self)
    }

    /// Load a named lesson set from the default fixture directory
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_lessons(name)?;

        Ok(fixture)
    }

    /// Get all lessons
    pub fn lessons(&self) -> &[LessonRecord] {
        &self.lessons
    }

    /// Build a catalog from the loaded lessons
    pub fn catalog(&self) -> Catalog {
        Catalog::with_lessons(self.lessons.iter().cloned())
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no lessons have been loaded yet.
    pub fn currency(&self) -> Result<&'static rusty_money::iso::Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
