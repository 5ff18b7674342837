//! Content Store — durable worries and cheers behind a swappable backend.
//!
//! `AppState` holds an `Arc<dyn WorryStore>`: `PgStore` when `DATABASE_URL`
//! is configured, `MemoryStore` otherwise (and in tests).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::worry::{Cheer, CheeredWorry, NewCheer, NewWorry, Stats, Worry};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Outcome of attaching a cheer. Re-submitting identical text to the same
/// worry is a no-op that hands back the cheer already stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheerInsert {
    Created(Cheer),
    Duplicate(Cheer),
}

impl CheerInsert {
    pub fn into_cheer(self) -> Cheer {
        match self {
            CheerInsert::Created(c) | CheerInsert::Duplicate(c) => c,
        }
    }
}

#[async_trait]
pub trait WorryStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    /// All worries newest first, optionally filtered by a case-insensitive
    /// substring of content or nickname.
    async fn list_worries(&self, search: Option<&str>) -> Result<Vec<Worry>, AppError>;

    async fn get_worry(&self, id: i32) -> Result<Option<Worry>, AppError>;

    async fn create_worry(&self, new_worry: NewWorry) -> Result<Worry, AppError>;

    /// Every worry with its cheer count, counted at read time.
    async fn worries_with_cheer_counts(&self) -> Result<Vec<CheeredWorry>, AppError>;

    /// Cheers for one worry, newest first.
    async fn list_cheers(&self, worry_id: i32) -> Result<Vec<Cheer>, AppError>;

    /// Fails with `AppError::NotFound` when the worry does not exist.
    async fn create_cheer(&self, new_cheer: NewCheer) -> Result<CheerInsert, AppError>;

    async fn stats(&self) -> Result<Stats, AppError>;
}
