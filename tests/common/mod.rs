//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use aulasense_core::{
    api::{build_router, AppState},
    AulaSenseError, Generation, Result, SqliteStorage, TextGenerator,
};
use axum::Router;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Create a seeded SQLite storage in a temporary directory
///
/// The `TempDir` must be kept alive for as long as the storage is used.
pub async fn create_test_storage() -> (SqliteStorage, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = SqliteStorage::open(dir.path().join("aulasense_test.db"))
        .await
        .expect("Failed to create test storage");
    (storage, dir)
}

/// Router over a fresh storage with the given generation capability
pub async fn create_test_router(generation: Generation) -> (Router, Arc<SqliteStorage>, TempDir) {
    let (storage, dir) = create_test_storage().await;
    let public_dir = dir.path().join("public");
    std::fs::create_dir_all(&public_dir).expect("Failed to create public dir");
    std::fs::write(public_dir.join("index.html"), "<h1>AulaSense</h1>")
        .expect("Failed to write index.html");

    let storage = Arc::new(storage);
    let state = AppState {
        storage: storage.clone(),
        generation,
    };
    (build_router(state, &public_dir), storage, dir)
}

/// Generator returning a fixed response and recording the prompts it saw
pub struct StubGenerator {
    response: String,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new(response: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            response: response.into(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }
}

/// Generator that always fails, like an unreachable provider
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(AulaSenseError::Generation(
            "OpenAI API error 401: invalid api key".to_string(),
        ))
    }
}

/// Generation backed by a stub response
pub fn stub_generation(response: &str) -> (Generation, Arc<StubGenerator>) {
    let stub = StubGenerator::new(response);
    (Generation::Enabled(stub.clone()), stub)
}
