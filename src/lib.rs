//! AulaSense - Classroom Feedback and Recommendation Service
//!
//! A small Rust service for schools that provides:
//! - Teacher login and classroom listing
//! - Storage of student survey submissions per classroom
//! - Per-classroom answer statistics across seven categories
//! - MINEDU-aligned tutoring recommendations from an OpenAI-compatible model
//!
//! # Architecture
//!
//! - **Types**: Core data structures (ClassroomId, Teacher, StoredSubmission)
//! - **Storage**: SQLite backend behind the `StorageBackend` trait
//! - **Insights**: Statistics, prompt building, output normalization and formatting
//! - **Services**: Text generation (OpenAI chat completions)
//! - **API**: Axum HTTP server and static dashboard
//!
//! # Example
//!
//! ```ignore
//! use aulasense_core::{insights, Generation, SqliteStorage, ClassroomId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let storage = SqliteStorage::open("aulasense.db").await?;
//!     let report = insights::recommend(&storage, &Generation::Disabled, ClassroomId(1)).await?;
//!     println!("{} usable submissions", report.stats.total);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod insights;
pub mod services;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{AulaSenseError, Result};
pub use insights::{
    ClassroomStats, RecommendationRaw, RecommendationRendered, RecommendationReport,
};
pub use services::{Generation, LlmConfig, LlmService, TextGenerator};
pub use storage::{sqlite::SqliteStorage, StorageBackend};
pub use types::{Classroom, ClassroomId, StoredSubmission, Teacher};
