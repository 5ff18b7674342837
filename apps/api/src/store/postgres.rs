use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::worry::{Cheer, CheeredWorry, NewCheer, NewWorry, Stats, Worry};
use crate::store::{CheerInsert, WorryStore};

/// PostgreSQL-backed store. Every write is a single statement, so no
/// explicit transactions are needed.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorryStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_worries(&self, search: Option<&str>) -> Result<Vec<Worry>, AppError> {
        Ok(sqlx::query_as::<_, Worry>(
            r#"
            SELECT id, content, nickname, created_at
            FROM worries
            WHERE $1::text IS NULL
               OR strpos(lower(content), lower($1)) > 0
               OR strpos(lower(nickname), lower($1)) > 0
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_worry(&self, id: i32) -> Result<Option<Worry>, AppError> {
        Ok(sqlx::query_as::<_, Worry>(
            "SELECT id, content, nickname, created_at FROM worries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_worry(&self, new_worry: NewWorry) -> Result<Worry, AppError> {
        let worry = sqlx::query_as::<_, Worry>(
            r#"
            INSERT INTO worries (content, nickname)
            VALUES ($1, $2)
            RETURNING id, content, nickname, created_at
            "#,
        )
        .bind(&new_worry.content)
        .bind(&new_worry.nickname)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted worry {} by '{}'", worry.id, worry.nickname);
        Ok(worry)
    }

    async fn worries_with_cheer_counts(&self) -> Result<Vec<CheeredWorry>, AppError> {
        Ok(sqlx::query_as::<_, CheeredWorry>(
            r#"
            SELECT w.id, w.content, w.nickname, w.created_at, COUNT(c.id) AS cheer_count
            FROM worries w
            LEFT JOIN cheers c ON c.worry_id = w.id
            GROUP BY w.id
            ORDER BY w.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_cheers(&self, worry_id: i32) -> Result<Vec<Cheer>, AppError> {
        Ok(sqlx::query_as::<_, Cheer>(
            r#"
            SELECT id, worry_id, content, created_at
            FROM cheers
            WHERE worry_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(worry_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_cheer(&self, new_cheer: NewCheer) -> Result<CheerInsert, AppError> {
        // Inserts only if the worry exists and the text is new for it;
        // the unique index on (worry_id, content) makes this race-free.
        let inserted = sqlx::query_as::<_, Cheer>(
            r#"
            INSERT INTO cheers (worry_id, content)
            SELECT $1::int4, $2::text
            WHERE EXISTS (SELECT 1 FROM worries WHERE id = $1)
            ON CONFLICT (worry_id, content) DO NOTHING
            RETURNING id, worry_id, content, created_at
            "#,
        )
        .bind(new_cheer.worry_id)
        .bind(&new_cheer.content)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(cheer) = inserted {
            info!("Inserted cheer {} for worry {}", cheer.id, cheer.worry_id);
            return Ok(CheerInsert::Created(cheer));
        }

        let existing = sqlx::query_as::<_, Cheer>(
            r#"
            SELECT id, worry_id, content, created_at
            FROM cheers
            WHERE worry_id = $1 AND content = $2
            "#,
        )
        .bind(new_cheer.worry_id)
        .bind(&new_cheer.content)
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some(cheer) => {
                debug!("Duplicate cheer {} for worry {} suppressed", cheer.id, cheer.worry_id);
                Ok(CheerInsert::Duplicate(cheer))
            }
            None => Err(AppError::NotFound(format!(
                "Worry {} not found",
                new_cheer.worry_id
            ))),
        }
    }

    async fn stats(&self) -> Result<Stats, AppError> {
        let (total_worries, total_cheers): (i64, i64) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM worries), (SELECT COUNT(*) FROM cheers)",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(Stats {
            total_worries,
            total_cheers,
        })
    }
}
