//! In-memory backend
//!
//! A self-contained [`Backend`] over a lesson list, with the same observable behaviour as the
//! HTTP backend: searches filter by subject or location, orders are recorded and seat updates are
//! applied (clamped at zero). Used for offline runs and tests.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    fixtures::Fixture,
    forms::{LoginForm, SignupForm},
    gateway::{AuthOutcome, Backend, GatewayError, UserProfile},
    lessons::LessonRecord,
    orders::{OrderDraft, SpaceUpdate},
    views::matches_query,
};

#[derive(Debug, Default)]
struct Account {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    lessons: Vec<LessonRecord>,
    orders: Vec<OrderDraft>,
    accounts: Vec<Account>,
    offline: bool,
    reject_space_updates: bool,
}

/// In-memory lesson backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// Create a backend serving the given lessons.
    pub fn new(lessons: impl IntoIterator<Item = LessonRecord>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                lessons: lessons.into_iter().collect(),
                ..MemoryState::default()
            }),
        }
    }

    /// Create a backend serving a fixture's lessons.
    pub fn from_fixture(fixture: &Fixture) -> Self {
        Self::new(fixture.lessons().iter().cloned())
    }

    /// Make every subsequent call fail as if the network were down.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Make seat updates fail while orders still succeed.
    pub async fn reject_space_updates(&self, reject: bool) {
        self.state.lock().await.reject_space_updates = reject;
    }

    /// Orders recorded so far.
    pub async fn orders(&self) -> Vec<OrderDraft> {
        self.state.lock().await.orders.clone()
    }

    /// Seats the backend currently reports for a lesson.
    pub async fn spaces(&self, lesson: &str) -> Option<u32> {
        self.state
            .lock()
            .await
            .lessons
            .iter()
            .find(|record| record.id.as_str() == lesson)
            .map(|record| record.spaces)
    }

    /// Change a lesson's seat count behind the client's back.
    pub async fn set_spaces(&self, lesson: &str, spaces: u32) {
        let mut state = self.state.lock().await;

        if let Some(record) = state
            .lessons
            .iter_mut()
            .find(|record| record.id.as_str() == lesson)
        {
            record.spaces = spaces;
            record.capacity = spaces;
        }
    }
}

fn offline() -> GatewayError {
    GatewayError::UnexpectedResponse("backend offline".to_string())
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn fetch_lessons(&self) -> Result<Vec<LessonRecord>, GatewayError> {
        let state = self.state.lock().await;

        if state.offline {
            return Err(offline());
        }

        Ok(state.lessons.clone())
    }

    async fn search(&self, query: &str) -> Result<Vec<LessonRecord>, GatewayError> {
        let state = self.state.lock().await;

        if state.offline {
            return Err(offline());
        }

        let needle = query.trim().to_lowercase();

        Ok(state
            .lessons
            .iter()
            .filter(|lesson| matches_query(lesson, &needle))
            .cloned()
            .collect())
    }

    async fn submit_order(&self, order: &OrderDraft) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;

        if state.offline {
            return Err(offline());
        }

        if order.lines.is_empty() {
            return Err(GatewayError::Rejected {
                message: "order has no lessons".to_string(),
            });
        }

        state.orders.push(order.clone());

        debug!(orders = state.orders.len(), "recorded order");

        Ok(())
    }

    async fn update_spaces(&self, updates: &[SpaceUpdate]) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;

        if state.offline {
            return Err(offline());
        }

        if state.reject_space_updates {
            return Err(GatewayError::Rejected {
                message: "seat update refused".to_string(),
            });
        }

        for update in updates {
            if let Some(lesson) = state
                .lessons
                .iter_mut()
                .find(|lesson| lesson.id == update.lesson)
            {
                let adjusted = i64::from(lesson.spaces).saturating_add(update.change).max(0);

                lesson.spaces = u32::try_from(adjusted).unwrap_or(u32::MAX);
                lesson.capacity = lesson.spaces;
            }
        }

        Ok(())
    }

    async fn login(&self, form: &LoginForm) -> Result<AuthOutcome, GatewayError> {
        let state = self.state.lock().await;

        if state.offline {
            return Err(offline());
        }

        let email = form.email.trim();

        let outcome = match state
            .accounts
            .iter()
            .find(|account| account.email == email && account.password == form.password)
        {
            Some(account) => AuthOutcome {
                success: true,
                message: None,
                user: Some(UserProfile {
                    name: account.name.clone(),
                    email: Some(account.email.clone()),
                }),
            },
            None => AuthOutcome {
                success: false,
                message: Some("Invalid email or password".to_string()),
                user: None,
            },
        };

        Ok(outcome)
    }

    async fn signup(&self, form: &SignupForm) -> Result<AuthOutcome, GatewayError> {
        let mut state = self.state.lock().await;

        if state.offline {
            return Err(offline());
        }

        let email = form.email.trim();

        if state.accounts.iter().any(|account| account.email == email) {
            return Ok(AuthOutcome {
                success: false,
                message: Some("Email already registered".to_string()),
                user: None,
            });
        }

        state.accounts.push(Account {
            name: form.name.trim().to_string(),
            email: email.to_string(),
            password: form.password.clone(),
        });

        Ok(AuthOutcome {
            success: true,
            message: Some("Signup successful".to_string()),
            user: None,
        })
    }

    async fn user_count(&self) -> Result<u64, GatewayError> {
        let state = self.state.lock().await;

        if state.offline {
            return Err(offline());
        }

        Ok(u64::try_from(state.accounts.len()).unwrap_or(u64::MAX))
    }
}
