//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::FullRepository;
use crate::services::{Clock, Notifier, TokenMinter};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Notification dispatcher (best-effort)
    pub notifier: Arc<dyn Notifier>,
    /// Join-token minting collaborator
    pub token_minter: Arc<dyn TokenMinter>,
    /// Time source for date/time validation and the join window
    pub clock: Arc<dyn Clock>,
    /// Engine tunables
    pub config: AppConfig,
}

impl AppState {
    /// Create application state with explicit collaborators.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        notifier: Arc<dyn Notifier>,
        token_minter: Arc<dyn TokenMinter>,
        clock: Arc<dyn Clock>,
        config: AppConfig,
    ) -> Self {
        Self {
            repository,
            notifier,
            token_minter,
            clock,
            config,
        }
    }

    /// State with default collaborators (tracing notifier, static token
    /// minter, wall clock) for the binary and tests.
    pub fn with_defaults(repository: Arc<dyn FullRepository>, config: AppConfig) -> Self {
        Self::new(
            repository,
            Arc::new(crate::services::TracingNotifier),
            Arc::new(crate::services::StaticTokenMinter),
            Arc::new(crate::services::SystemClock),
            config,
        )
    }
}
