//! Caller-facing errors

use thiserror::Error;

use crate::config::ConfigError;
use crate::models::Provider;
use crate::transport::TransportError;

/// Router errors
///
/// Execution failures carry the model and provider that were being called.
/// Nothing in the router retries or substitutes another model; that is the
/// caller's decision.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouterError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Call to {model_id} ({provider}) failed: {source}")]
    Transport {
        model_id: String,
        provider: Provider,
        #[source]
        source: TransportError,
    },
    #[error("Unparseable response from {model_id} ({provider}): {message}")]
    ResponseParse {
        model_id: String,
        provider: Provider,
        message: String,
    },
}

impl RouterError {
    /// Attach model context to a transport failure
    pub fn from_transport(model_id: &str, provider: Provider, err: TransportError) -> Self {
        match err {
            TransportError::MissingCredential => {
                RouterError::Configuration(ConfigError::MissingEnvVar(
                    crate::config::ENV_API_KEY.to_string(),
                ))
            }
            TransportError::InvalidResponse(message) => RouterError::ResponseParse {
                model_id: model_id.to_string(),
                provider,
                message,
            },
            other => RouterError::Transport {
                model_id: model_id.to_string(),
                provider,
                source: other,
            },
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RouterError::Transport { .. })
    }
}
