use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::worry::{Cheer, CheeredWorry, NewCheer, NewWorry, Stats, Worry};
use crate::routes::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use crate::store::CheerInsert;
use crate::worries::moderation::ModerationVerdict;
use crate::worries::nickname::{generate_nickname, needs_generated};
use crate::worries::selection::{draw_worry, RecentHistory};

#[derive(Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct DrawQuery {
    /// Comma-separated worry ids, most recently shown first.
    pub history: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResponse {
    #[serde(flatten)]
    pub worry: CheeredWorry,
    pub recent_history: Vec<i32>,
}

#[derive(Deserialize)]
pub struct CreateWorryRequest {
    pub content: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheerRequest {
    pub worry_id: i32,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ModerationCheckRequest {
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportReceipt {
    pub report_id: Uuid,
    pub worry_id: i32,
    pub status: &'static str,
}

/// Parses the `history` query value. Blank segments are skipped.
pub fn parse_history(raw: Option<&str>) -> Result<RecentHistory, AppError> {
    let Some(raw) = raw else {
        return Ok(RecentHistory::default());
    };

    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>().map_err(|_| {
                AppError::Validation(format!(
                    "history must be comma-separated worry ids, got '{s}'"
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecentHistory::from_ids(ids))
}

async fn require_worry(state: &AppState, id: i32) -> Result<Worry, AppError> {
    state
        .store
        .get_worry(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Worry {id} not found")))
}

/// GET /api/worries
pub async fn handle_list_worries(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Worry>>, AppError> {
    let search = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    Ok(Json(state.store.list_worries(search).await?))
}

/// GET /api/worries/random
pub async fn handle_draw_worry(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DrawQuery>,
) -> Result<Json<DrawResponse>, AppError> {
    let mut history = parse_history(params.history.as_deref())?;
    let worries = state.store.worries_with_cheer_counts().await?;

    let drawn = {
        let mut rng = rand::rng();
        draw_worry(&worries, &mut history, &mut rng).cloned()
    }
    .ok_or_else(|| AppError::NotFound("No worries available".to_string()))?;

    info!(
        "Drew worry {} ({} cheers) from {} worries",
        drawn.worry.id,
        drawn.cheer_count,
        worries.len()
    );

    Ok(Json(DrawResponse {
        worry: drawn,
        recent_history: history.to_vec(),
    }))
}

/// GET /api/worries/:id
pub async fn handle_get_worry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Worry>, AppError> {
    Ok(Json(require_worry(&state, id).await?))
}

/// POST /api/worries
pub async fn handle_create_worry(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateWorryRequest>,
) -> Result<(StatusCode, Json<Worry>), AppError> {
    let content = state.moderation.validate(&req.content)?.to_string();

    let nickname = match req.nickname.as_deref() {
        Some(n) if !needs_generated(Some(n)) => state.moderation.validate_nickname(n)?.to_string(),
        _ => generate_nickname(&mut rand::rng()),
    };

    let worry = state
        .store
        .create_worry(NewWorry { content, nickname })
        .await?;
    Ok((StatusCode::CREATED, Json(worry)))
}

/// GET /api/worries/:id/cheers
pub async fn handle_list_cheers(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Vec<Cheer>>, AppError> {
    require_worry(&state, id).await?;
    Ok(Json(state.store.list_cheers(id).await?))
}

/// POST /api/cheers
///
/// 201 for a new cheer, 200 with the stored cheer when the same text was
/// already attached to this worry.
pub async fn handle_create_cheer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateCheerRequest>,
) -> Result<(StatusCode, Json<Cheer>), AppError> {
    let content = state.moderation.validate(&req.content)?.to_string();

    let outcome = state
        .store
        .create_cheer(NewCheer {
            worry_id: req.worry_id,
            content,
        })
        .await?;

    let status = match outcome {
        CheerInsert::Created(_) => StatusCode::CREATED,
        CheerInsert::Duplicate(_) => StatusCode::OK,
    };
    Ok((status, Json(outcome.into_cheer())))
}

/// POST /api/worries/:id/report
///
/// Acknowledgement only: the report is logged for manual review, not stored.
pub async fn handle_report_worry(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<(StatusCode, Json<ReportReceipt>), AppError> {
    require_worry(&state, id).await?;

    let report_id = Uuid::new_v4();
    warn!("Worry {id} reported for review (report {report_id})");

    Ok((
        StatusCode::ACCEPTED,
        Json(ReportReceipt {
            report_id,
            worry_id: id,
            status: "received",
        }),
    ))
}

/// GET /api/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<Stats>, AppError> {
    Ok(Json(state.store.stats().await?))
}

/// POST /api/moderation/check
pub async fn handle_moderation_check(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ModerationCheckRequest>,
) -> Json<ModerationVerdict> {
    Json(state.moderation.verdict(&req.content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_absent() {
        assert!(parse_history(None).unwrap().to_vec().is_empty());
    }

    #[test]
    fn test_parse_history_skips_blanks() {
        let history = parse_history(Some(" 3, ,1,2,")).unwrap();
        assert_eq!(history.to_vec(), vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_history_truncates_to_ten() {
        let raw = (1..=12).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
        assert_eq!(parse_history(Some(&raw)).unwrap().to_vec().len(), 10);
    }

    #[test]
    fn test_parse_history_rejects_garbage() {
        assert!(matches!(
            parse_history(Some("1,abc")),
            Err(AppError::Validation(_))
        ));
    }
}
