//! Statistics route

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::StatisticsService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use training_tracker_shared::types::StatisticsQuery;
use training_tracker_shared::{ChartData, StatisticsKind};
use uuid::Uuid;

/// GET /api/v1/training-plans/:plan_id/statistics/:kind?categories=squat,bench
///
/// `kind` is one of `sets`, `tonnage`, `rpe`. The response maps each known
/// requested category to one value per week.
pub(super) async fn get_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((plan_id, kind)): Path<(Uuid, String)>,
    Query(query): Query<StatisticsQuery>,
) -> ApiResult<Json<ChartData>> {
    let kind: StatisticsKind = kind.parse().map_err(ApiError::BadRequest)?;
    let chart = StatisticsService::calculate(
        state.users(),
        auth.user_id,
        plan_id,
        kind,
        &query.category_list(),
    )
    .await?;
    Ok(Json(chart))
}
