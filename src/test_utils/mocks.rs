//! Scripted [`ResultProvider`] for tests that must not touch the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{BtebError, Result};
use crate::result::{ResultProvider, ResultQuery, StudentResult};

/// Answers lookups from a fixed table of rolls. Unknown rolls are not
/// found; rolls registered with [`MockResultProvider::with_failure`] fail
/// with an upstream error.
#[derive(Default)]
pub struct MockResultProvider {
    results: HashMap<String, StudentResult>,
    failures: HashMap<String, String>,
    calls: AtomicUsize,
    queries: Mutex<Vec<ResultQuery>>,
}

impl MockResultProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, roll: impl Into<String>, result: StudentResult) -> Self {
        self.results.insert(roll.into(), result);
        self
    }

    pub fn with_failure(mut self, roll: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(roll.into(), message.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> Vec<ResultQuery> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

impl ResultProvider for MockResultProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch(&self, query: &ResultQuery) -> Result<StudentResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }

        if let Some(message) = self.failures.get(query.roll()) {
            return Err(BtebError::upstream(Some(500), message.clone()));
        }

        self.results
            .get(query.roll())
            .cloned()
            .ok_or_else(|| BtebError::result_not_found(query.roll(), query.regulation().id()))
    }
}
