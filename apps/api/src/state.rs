use std::sync::Arc;

use crate::store::WorryStore;
use crate::worries::moderation::ModerationFilter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable content store. Postgres when `DATABASE_URL` is set, memory otherwise.
    pub store: Arc<dyn WorryStore>,
    pub moderation: Arc<ModerationFilter>,
}
