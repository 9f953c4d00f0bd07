//! Configuration
//!
//! Settings come from command line flags, falling back to environment variables and then to a
//! `.env` file in the working directory.

use std::time::Duration;

use clap::Args;

use crate::{
    config::{backend::BackendConfig, observability::LoggingConfig},
    fixtures::{Fixture, FixtureError},
    gateway::HttpBackendConfig,
    storefront::StorefrontOptions,
};

pub mod backend;
pub mod observability;

pub use observability::LogFormat;

/// Seatcart configuration
#[derive(Debug, Args)]
pub struct Config {
    /// Backend connection settings.
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Settings for the HTTP backend client
    pub fn http_backend_config(&self) -> HttpBackendConfig {
        HttpBackendConfig {
            base_url: self.backend.api_url.clone(),
            timeout: Duration::from_secs(self.backend.request_timeout_seconds),
            currency: self.backend.currency,
        }
    }

    /// Settings for a storefront session
    pub fn storefront_options(&self) -> StorefrontOptions {
        StorefrontOptions {
            currency: self.backend.currency,
            search_debounce: Duration::from_millis(self.backend.search_debounce_ms),
        }
    }

    /// Settings for a storefront served from a fixture set.
    ///
    /// The fixture's prices decide the currency; the configured one is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if the fixture holds no lessons.
    pub fn offline_storefront_options(
        &self,
        fixture: &Fixture,
    ) -> Result<StorefrontOptions, FixtureError> {
        Ok(StorefrontOptions {
            currency: fixture.currency()?,
            ..self.storefront_options()
        })
    }
}

/// Load a `.env` file into the process environment, if one is present.
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        tracing::debug!(error = %err, "ignoring unreadable .env file");
    }
}
