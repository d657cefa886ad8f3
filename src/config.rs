//! Configuration for AulaSense
//!
//! Settings are layered, later sources winning:
//! 1. Built-in defaults
//! 2. Optional `aulasense.toml` (or the file given with `--config`)
//! 3. Environment variables (`PORT`, `HOST`, `AULASENSE_DB_PATH`,
//!    `AULASENSE_PUBLIC_DIR`, `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL`)
//! 4. Command-line overrides

use crate::error::Result;
use crate::services::llm::{LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "aulasense.toml";

/// Flat view of every configuration source
#[derive(Debug, Deserialize)]
struct RawSettings {
    host: String,
    port: u16,
    aulasense_db_path: PathBuf,
    aulasense_public_dir: PathBuf,
    openai_api_key: Option<String>,
    openai_model: String,
    openai_base_url: String,
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub addr: Option<String>,
    pub public_dir: Option<PathBuf>,
}

/// Resolved service settings
#[derive(Debug)]
pub struct Settings {
    /// Listen address
    pub addr: SocketAddr,
    /// SQLite database file
    pub db_path: PathBuf,
    /// Directory served for non-API paths
    pub public_dir: PathBuf,
    /// Generation settings, `None` when no API key is configured
    pub llm: Option<LlmConfig>,
}

impl Settings {
    /// Load settings from defaults, file, environment and overrides
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let file = overrides
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        debug!("Loading configuration (file: {})", file.display());

        let mut builder = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("aulasense_db_path", "aulasense.db")?
            .set_default("aulasense_public_dir", "public")?
            .set_default("openai_model", DEFAULT_MODEL)?
            .set_default("openai_base_url", DEFAULT_BASE_URL)?
            .add_source(File::from(file).required(overrides.config_file.is_some()))
            .add_source(Environment::default().try_parsing(true));

        if let Some(db_path) = &overrides.db_path {
            builder = builder
                .set_override("aulasense_db_path", db_path.to_string_lossy().to_string())?;
        }
        if let Some(public_dir) = &overrides.public_dir {
            builder = builder.set_override(
                "aulasense_public_dir",
                public_dir.to_string_lossy().to_string(),
            )?;
        }

        let raw: RawSettings = builder.build()?.try_deserialize()?;
        Self::from_raw(raw, overrides.addr.as_deref())
    }

    fn from_raw(raw: RawSettings, addr_override: Option<&str>) -> Result<Self> {
        let addr_text = match addr_override {
            Some(addr) => addr.to_string(),
            None => format!("{}:{}", raw.host, raw.port),
        };
        let addr: SocketAddr = addr_text.parse().map_err(|e| {
            config::ConfigError::Message(format!("Invalid listen address '{}': {}", addr_text, e))
        })?;

        let llm = match raw.openai_api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => {
                info!("OpenAI generation enabled (model: {})", raw.openai_model);
                let mut llm = LlmConfig::new(SecretString::new(key.into()));
                llm.model = raw.openai_model;
                llm.base_url = raw.openai_base_url;
                Some(llm)
            }
            None => {
                warn!("OPENAI_API_KEY not configured, running without AI recommendations");
                None
            }
        };

        Ok(Self {
            addr,
            db_path: raw.aulasense_db_path,
            public_dir: raw.aulasense_public_dir,
            llm,
        })
    }
}
