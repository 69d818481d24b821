//! Run context for the batch and monitoring runners
//!
//! Everything the pipeline used to reach for ambiently (the HTTP client,
//! endpoint configuration, pacing, credential, and operation mode) travels
//! in one explicit context object so the pipeline functions stay pure given
//! their inputs.

use crate::config::{Config, OperationMode, PacingConfig, RemoteConfig};
use crate::remote::build_http_client;
use crate::LinkampError;
use reqwest::Client;

/// Shared, immutable context for one run
#[derive(Debug, Clone)]
pub struct AmplifyContext {
    pub client: Client,
    pub remote: RemoteConfig,
    pub pacing: PacingConfig,

    /// Bearer credential for the search notification service
    pub credential: Option<String>,

    /// Standard, or privacy (search notification forbidden)
    pub operation_mode: OperationMode,
}

impl AmplifyContext {
    /// Builds a context from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, LinkampError> {
        let client = build_http_client(&config.http)?;

        Ok(Self {
            client,
            remote: config.remote.clone(),
            pacing: config.pacing.clone(),
            credential: config.search.token.clone(),
            operation_mode: config.mode.operation_mode,
        })
    }

    /// Overrides the operation mode, e.g. from persisted settings
    pub fn with_operation_mode(mut self, mode: OperationMode) -> Self {
        self.operation_mode = mode;
        self
    }
}
