//! Sync Gateway
//!
//! Everything that talks to the lesson backend. Responses are normalized into
//! [`LessonRecord`]s at this boundary so the rest of the crate never sees the raw wire shape.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    forms::{LoginForm, SignupForm},
    lessons::LessonRecord,
    orders::{OrderDraft, SpaceUpdate},
};

pub mod credentials;
pub mod debounce;
pub mod http;
pub mod memory;
pub mod wire;

pub use credentials::{CredentialsError, submit_login, submit_signup};
pub use debounce::{SearchCompletion, SearchDebouncer};
pub use http::{HttpBackend, HttpBackendConfig};
pub use memory::MemoryBackend;

/// Errors that can occur when communicating with the backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-2xx response or an unexpected body.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),

    /// The backend answered but reported `success: false`.
    #[error("request rejected: {message}")]
    Rejected {
        /// Message from the backend
        message: String,
    },
}

impl GatewayError {
    /// Message reported by the backend, when it rejected the request.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => Some(message),
            Self::Http(_) | Self::UnexpectedResponse(_) => None,
        }
    }
}

/// Signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Account email
    pub email: Option<String>,
}

/// Result of a login or signup attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthOutcome {
    /// Whether the backend accepted the credentials
    pub success: bool,

    /// Message from the backend, if any
    pub message: Option<String>,

    /// The user, on a successful login
    pub user: Option<UserProfile>,
}

/// The lesson backend.
#[automock]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the full lesson catalog.
    async fn fetch_lessons(&self) -> Result<Vec<LessonRecord>, GatewayError>;

    /// Fetch the lessons matching a non-empty search query.
    async fn search(&self, query: &str) -> Result<Vec<LessonRecord>, GatewayError>;

    /// Persist an order.
    async fn submit_order(&self, order: &OrderDraft) -> Result<(), GatewayError>;

    /// Apply a batch of seat count changes.
    async fn update_spaces(&self, updates: &[SpaceUpdate]) -> Result<(), GatewayError>;

    /// Check login credentials.
    async fn login(&self, form: &LoginForm) -> Result<AuthOutcome, GatewayError>;

    /// Register a new account.
    async fn signup(&self, form: &SignupForm) -> Result<AuthOutcome, GatewayError>;

    /// Number of registered users.
    async fn user_count(&self) -> Result<u64, GatewayError>;
}

impl fmt::Debug for dyn Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Backend")
    }
}

/// Run a catalog query: a blank query is a full fetch, anything else a search.
///
/// # Errors
///
/// Returns whatever the backend call returns.
pub async fn load_lessons(
    backend: &dyn Backend,
    query: &str,
) -> Result<Vec<LessonRecord>, GatewayError> {
    let query = query.trim();

    if query.is_empty() {
        backend.fetch_lessons().await
    } else {
        backend.search(query).await
    }
}
