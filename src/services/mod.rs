//! External services used by the recommendation pipeline

pub mod llm;

pub use llm::{LlmConfig, LlmService};

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// Anything that turns a prompt into raw model text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Single request/response exchange, no retry
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generation capability injected into the pipeline
#[derive(Clone)]
pub enum Generation {
    /// No credential configured; recommendations are replaced by a fixed notice
    Disabled,
    /// Calls go to the wrapped generator
    Enabled(Arc<dyn TextGenerator>),
}

impl Generation {
    /// Build from an optional LLM configuration
    pub fn from_config(config: Option<LlmConfig>) -> Result<Self> {
        match config {
            Some(config) => {
                let service = LlmService::new(config)?;
                info!("Recommendations generated with model {}", service.model());
                Ok(Self::Enabled(Arc::new(service)))
            }
            None => Ok(Self::Disabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Generation::Enabled(_))
    }
}

impl std::fmt::Debug for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generation::Disabled => write!(f, "Generation::Disabled"),
            Generation::Enabled(_) => write!(f, "Generation::Enabled"),
        }
    }
}
