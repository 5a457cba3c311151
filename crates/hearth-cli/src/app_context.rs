use std::sync::Arc;

use anyhow::{Context, Result};

use hearth_api::{ApiClient, ApiClientConfig, HouseholdBackend};

use crate::cli_args::Cli;

/// Explicitly owned process context: the resolved configuration plus the
/// shared, already-authenticated backend handle. Built once in `main` and
/// passed to command handlers; dropping it is the teardown.
pub struct AppContext {
    pub api_base: String,
    pub backend: Arc<dyn HouseholdBackend>,
}

impl AppContext {
    pub fn initialize(cli: &Cli) -> Result<Self> {
        let client = ApiClient::new(ApiClientConfig {
            api_base: cli.api_base.clone(),
            auth_token: cli.auth_token.clone(),
            request_timeout_ms: cli.request_timeout_ms,
        })
        .context("failed to build the backend client")?;

        let context = Self {
            api_base: cli.api_base.trim_end_matches('/').to_string(),
            backend: Arc::new(client),
        };
        tracing::debug!(api_base = %context.api_base, "backend client ready");
        Ok(context)
    }
}
