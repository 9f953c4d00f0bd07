//! HTTP backend client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    forms::{LoginForm, SignupForm},
    gateway::{
        AuthOutcome, Backend, GatewayError,
        wire::{
            AuthResponse, LessonsResponse, LoginRequest, OrderRequest, SignupRequest,
            StatusResponse, UpdateSpacesRequest, UserCountResponse,
        },
    },
    lessons::LessonRecord,
    orders::{OrderDraft, SpaceUpdate},
};

/// Configuration for connecting to the lesson backend.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Backend base URL, e.g. `"http://localhost:3000"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Currency prices are quoted in.
    pub currency: &'static Currency,
}

/// HTTP client for the lesson backend's JSON API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: HttpBackendConfig,
    http: Client,
}

impl HttpBackend {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: HttpBackendConfig) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn fetch_catalog(&self, request: RequestBuilder) -> Result<Vec<LessonRecord>, GatewayError> {
        let response: LessonsResponse = send_json(request, "lessons").await?;

        match (response.success, response.lessons) {
            (true, Some(lessons)) => Ok(lessons
                .into_iter()
                .map(|lesson| lesson.normalize(self.config.currency))
                .collect()),
            _ => Err(GatewayError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "no lessons returned".to_string()),
            }),
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_lessons(&self) -> Result<Vec<LessonRecord>, GatewayError> {
        let lessons = self
            .fetch_catalog(self.http.get(self.url("/api/lessons")))
            .await?;

        debug!(lessons = lessons.len(), "fetched lessons");

        Ok(lessons)
    }

    async fn search(&self, query: &str) -> Result<Vec<LessonRecord>, GatewayError> {
        let request = self.http.get(self.url("/api/search")).query(&[("q", query)]);
        let lessons = self.fetch_catalog(request).await?;

        debug!(query, lessons = lessons.len(), "searched lessons");

        Ok(lessons)
    }

    async fn submit_order(&self, order: &OrderDraft) -> Result<(), GatewayError> {
        let request = self
            .http
            .post(self.url("/api/orders"))
            .json(&OrderRequest::from(order));

        let response: StatusResponse = send_json(request, "order").await?;

        ensure_success(response)
    }

    async fn update_spaces(&self, updates: &[SpaceUpdate]) -> Result<(), GatewayError> {
        let request = self
            .http
            .put(self.url("/api/update-spaces"))
            .json(&UpdateSpacesRequest::from(updates));

        let response: StatusResponse = send_json(request, "update-spaces").await?;

        ensure_success(response)
    }

    async fn login(&self, form: &LoginForm) -> Result<AuthOutcome, GatewayError> {
        let request = self
            .http
            .post(self.url("/api/login"))
            .json(&LoginRequest::from(form));

        auth_outcome(request).await
    }

    async fn signup(&self, form: &SignupForm) -> Result<AuthOutcome, GatewayError> {
        let request = self
            .http
            .post(self.url("/api/signup"))
            .json(&SignupRequest::from(form));

        auth_outcome(request).await
    }

    async fn user_count(&self) -> Result<u64, GatewayError> {
        let response: UserCountResponse =
            send_json(self.http.get(self.url("/api/user-count")), "user-count").await?;

        match (response.success, response.count) {
            (true, Some(count)) => Ok(count),
            _ => Err(GatewayError::UnexpectedResponse(
                "user count missing from response".to_string(),
            )),
        }
    }
}

async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    context: &str,
) -> Result<T, GatewayError> {
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if let Ok(StatusResponse {
            message: Some(message),
            ..
        }) = serde_json::from_str::<StatusResponse>(&text)
        {
            return Err(GatewayError::Rejected { message });
        }

        return Err(GatewayError::UnexpectedResponse(format!(
            "{context} request failed with status {status}: {text}"
        )));
    }

    Ok(response.json().await?)
}

/// Login and signup report refusals in the body; only transport failures are errors.
async fn auth_outcome(request: RequestBuilder) -> Result<AuthOutcome, GatewayError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    match serde_json::from_str::<AuthResponse>(&text) {
        Ok(body) => Ok(body.into()),
        Err(_err) if !status.is_success() => Ok(AuthOutcome {
            success: false,
            message: Some(format!("request failed with status {status}")),
            user: None,
        }),
        Err(err) => Err(GatewayError::UnexpectedResponse(format!(
            "malformed auth response: {err}"
        ))),
    }
}

fn ensure_success(response: StatusResponse) -> Result<(), GatewayError> {
    if response.success {
        Ok(())
    } else {
        Err(GatewayError::Rejected {
            message: response.message.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn backend(base_url: &str) -> Result<HttpBackend, GatewayError> {
        HttpBackend::new(HttpBackendConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(1),
            currency: GBP,
        })
    }

    #[test]
    fn url_joins_without_double_slash() -> TestResult {
        let backend = backend("http://localhost:3000/")?;

        assert_eq!(
            backend.url("/api/lessons"),
            "http://localhost:3000/api/lessons"
        );

        Ok(())
    }

    #[test]
    fn ensure_success_maps_failure_to_rejection() {
        let result = ensure_success(StatusResponse {
            success: false,
            message: Some("out of seats".to_string()),
        });

        assert!(matches!(
            result,
            Err(GatewayError::Rejected { ref message }) if message == "out of seats"
        ));
        assert!(
            ensure_success(StatusResponse {
                success: true,
                message: None,
            })
            .is_ok()
        );
    }

    #[tokio::test]
    async fn unreachable_backend_is_http_error() -> TestResult {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let backend = backend("http://127.0.0.1:9")?;

        let result = backend.fetch_lessons().await;

        assert!(matches!(result, Err(GatewayError::Http(_))));

        Ok(())
    }
}
