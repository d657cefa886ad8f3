//! Storage layer for AulaSense
//!
//! Append-only survey submissions plus the seeded classroom and teacher
//! tables. Submissions are never updated or deleted.

pub mod sqlite;

use crate::error::Result;
use crate::types::{Classroom, ClassroomId, StoredSubmission, Teacher};
use async_trait::async_trait;
use serde_json::Value;

/// Storage backend trait defining all required operations
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Match a username/password pair against the teacher table
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Teacher>>;

    /// All classrooms
    async fn list_classrooms(&self) -> Result<Vec<Classroom>>;

    /// Store a new submission for a classroom
    async fn append_submission(&self, classroom: ClassroomId, payload: &Value) -> Result<()>;

    /// Submissions of one classroom, newest first
    async fn list_submissions(&self, classroom: ClassroomId) -> Result<Vec<StoredSubmission>>;

    /// Submissions of every classroom, newest first
    async fn list_all_submissions(&self) -> Result<Vec<StoredSubmission>>;
}
