//! HTTP API for the classroom dashboard
//!
//! Provides:
//! - Teacher login and classroom listing
//! - Survey submission storage and listing
//! - AI recommendations built from classroom statistics
//! - Static file serving for the dashboard

pub mod error;
pub mod server;

pub use error::{ApiError, ApiJson};
pub use server::{build_router, ApiServer, ApiServerConfig, AppState};
