//! Wire format
//!
//! JSON bodies exchanged with the backend, and their normalization. The backend is inconsistent
//! between endpoints (`id` vs `_id`, `price` vs `Price`, numbers sent as strings); those
//! differences are resolved here and nowhere else.

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    forms::{LoginForm, SignupForm},
    gateway::{AuthOutcome, UserProfile},
    lessons::{LessonId, LessonRecord},
    orders::{OrderDraft, SpaceUpdate},
    pricing::{major_units, money_or_zero},
};

/// Id used when the backend sends neither `id` nor `_id`.
pub const UNKNOWN_LESSON_ID: &str = "Unknown";

/// Response of `GET /api/lessons` and `GET /api/search`.
#[derive(Debug, Deserialize)]
pub struct LessonsResponse {
    /// Whether the request succeeded
    #[serde(default)]
    pub success: bool,

    /// Lessons, when successful
    #[serde(default)]
    pub lessons: Option<Vec<WireLesson>>,

    /// Failure message
    #[serde(default)]
    pub message: Option<String>,
}

/// A lesson as sent by the backend.
#[derive(Debug, Default, Deserialize)]
pub struct WireLesson {
    /// Canonical id
    #[serde(default)]
    pub id: Option<WireId>,

    /// Document-store id used by some endpoints
    #[serde(default, rename = "_id")]
    pub document_id: Option<WireId>,

    /// Subject
    #[serde(default)]
    pub subject: String,

    /// Location
    #[serde(default)]
    pub location: String,

    /// Seat price
    #[serde(default)]
    pub price: Option<WireNumber>,

    /// Seat price under its capitalised name
    #[serde(default, rename = "Price")]
    pub capitalised_price: Option<WireNumber>,

    /// Available seats
    #[serde(default)]
    pub spaces: Option<WireNumber>,
}

/// An id that may arrive as a string, a number or an extended-JSON object id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    /// Plain string id
    Text(String),

    /// Numeric id
    Number(i64),

    /// `{"$oid": "..."}`
    ObjectId {
        /// Hex object id
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl WireId {
    fn into_lesson_id(self) -> Option<LessonId> {
        let id = match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
            Self::ObjectId { oid } => oid,
        };

        let trimmed = id.trim();

        (!trimmed.is_empty()).then(|| LessonId::new(trimmed))
    }
}

/// A number that may arrive as JSON number or numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    /// JSON number
    Number(f64),

    /// Numeric string, e.g. `"19.99"`
    Text(String),
}

impl WireNumber {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) if value.is_finite() => Decimal::from_f64_retain(*value),
            Self::Number(_) => None,
            Self::Text(text) => text.trim().parse::<Decimal>().ok(),
        }
    }

    fn to_count(&self) -> u32 {
        self.to_decimal()
            .filter(|value| !value.is_sign_negative())
            .and_then(|value| value.trunc().to_u32())
            .unwrap_or(0)
    }
}

impl WireLesson {
    /// Normalize into the canonical lesson shape.
    ///
    /// `id` wins over `_id`, `Price` wins over `price`; missing or unparseable prices and seat
    /// counts become zero.
    pub fn normalize(self, currency: &'static Currency) -> LessonRecord {
        let id = self
            .id
            .and_then(WireId::into_lesson_id)
            .or_else(|| self.document_id.and_then(WireId::into_lesson_id))
            .unwrap_or_else(|| LessonId::new(UNKNOWN_LESSON_ID));

        let price = self
            .capitalised_price
            .as_ref()
            .or(self.price.as_ref())
            .and_then(WireNumber::to_decimal);

        let spaces = self.spaces.as_ref().map_or(0, WireNumber::to_count);

        LessonRecord::new(
            id,
            self.subject,
            self.location,
            money_or_zero(price, currency),
            spaces,
        )
    }
}

/// Generic `{success, message}` response.
#[derive(Debug, Default, Deserialize)]
pub struct StatusResponse {
    /// Whether the request succeeded
    #[serde(default)]
    pub success: bool,

    /// Failure or info message
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /api/login` and `POST /api/signup`.
#[derive(Debug, Default, Deserialize)]
pub struct AuthResponse {
    /// Whether the credentials were accepted
    #[serde(default)]
    pub success: bool,

    /// Message from the backend
    #[serde(default)]
    pub message: Option<String>,

    /// Signed-in user
    #[serde(default)]
    pub user: Option<WireUser>,
}

/// User as sent by the backend.
#[derive(Debug, Default, Deserialize)]
pub struct WireUser {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

impl From<AuthResponse> for AuthOutcome {
    fn from(response: AuthResponse) -> Self {
        Self {
            success: response.success,
            message: response.message,
            user: response.user.map(|user| UserProfile {
                name: user.name,
                email: user.email,
            }),
        }
    }
}

/// Response of `GET /api/user-count`.
#[derive(Debug, Default, Deserialize)]
pub struct UserCountResponse {
    /// Whether the request succeeded
    #[serde(default)]
    pub success: bool,

    /// Registered users
    #[serde(default)]
    pub count: Option<u64>,
}

/// Body of `POST /api/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Account email
    pub email: &'a str,

    /// Account password
    pub password: &'a str,
}

impl<'a> From<&'a LoginForm> for LoginRequest<'a> {
    fn from(form: &'a LoginForm) -> Self {
        Self {
            email: form.email.trim(),
            password: &form.password,
        }
    }
}

/// Body of `POST /api/signup`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest<'a> {
    /// Full name
    pub name: &'a str,

    /// Account email
    pub email: &'a str,

    /// Password
    pub password: &'a str,

    /// Password confirmation
    pub confirm_password: &'a str,
}

impl<'a> From<&'a SignupForm> for SignupRequest<'a> {
    fn from(form: &'a SignupForm) -> Self {
        Self {
            name: form.name.trim(),
            email: form.email.trim(),
            password: &form.password,
            confirm_password: &form.confirm_password,
        }
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest<'a> {
    /// Customer name
    pub name: &'a str,

    /// Customer phone
    pub phone: &'a str,

    /// Ordered lessons
    pub lessons: Vec<OrderLessonBody<'a>>,

    /// Total in major units
    pub total_price: f64,

    /// When the order was placed
    pub date_of_order: Timestamp,
}

/// One ordered lesson.
#[derive(Debug, Serialize)]
pub struct OrderLessonBody<'a> {
    /// Lesson id
    pub id: &'a LessonId,

    /// Lesson subject
    pub subject: &'a str,

    /// Seats ordered
    pub quantity: u32,
}

impl<'a> From<&'a OrderDraft> for OrderRequest<'a> {
    fn from(draft: &'a OrderDraft) -> Self {
        Self {
            name: &draft.customer_name,
            phone: &draft.customer_phone,
            lessons: draft
                .lines
                .iter()
                .map(|line| OrderLessonBody {
                    id: &line.lesson,
                    subject: &line.subject,
                    quantity: line.quantity,
                })
                .collect(),
            total_price: major_units(&draft.total_price).to_f64().unwrap_or(0.0),
            date_of_order: draft.placed_at,
        }
    }
}

/// Body of `PUT /api/update-spaces`.
#[derive(Debug, Serialize)]
pub struct UpdateSpacesRequest<'a> {
    /// Seat count changes
    pub updates: Vec<SpaceUpdateBody<'a>>,
}

/// One seat count change.
#[derive(Debug, Serialize)]
pub struct SpaceUpdateBody<'a> {
    /// Lesson id
    pub id: &'a LessonId,

    /// Signed change
    pub change: i64,
}

impl<'a> From<&'a [SpaceUpdate]> for UpdateSpacesRequest<'a> {
    fn from(updates: &'a [SpaceUpdate]) -> Self {
        Self {
            updates: updates
                .iter()
                .map(|update| SpaceUpdateBody {
                    id: &update.lesson,
                    change: update.change,
                })
                .collect(),
        }
    }
}
