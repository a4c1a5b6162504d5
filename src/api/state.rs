//! Application state for the shift planner API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::planner::Planner;

/// Shared application state.
///
/// Holds the one planner instance behind a mutex so that requests are
/// served one at a time.
#[derive(Clone)]
pub struct AppState {
    planner: Arc<Mutex<Planner>>,
}

impl AppState {
    /// Creates a new application state around the given planner.
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(Mutex::new(planner)),
        }
    }

    /// Locks the planner for the duration of one request.
    pub async fn planner(&self) -> MutexGuard<'_, Planner> {
        self.planner.lock().await
    }
}
