//! Training plan API routes

use super::statistics;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::TrainingPlanService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use training_tracker_shared::types::{
    CreateTrainingPlanRequest, TrainingDayResponse, UpdateTrainingDayRequest,
    UpdateTrainingPlanRequest,
};
use training_tracker_shared::{TrainingPlanCardView, TrainingPlanEditView};
use uuid::Uuid;

/// Create training plan routes
pub fn training_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route(
            "/:plan_id",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/:plan_id/weeks", post(add_week))
        .route("/:plan_id/weeks/:week", delete(remove_week))
        .route(
            "/:plan_id/weeks/:week/days/:day",
            get(get_day).put(update_day),
        )
        .route("/:plan_id/statistics/:kind", get(statistics::get_statistics))
}

/// GET /api/v1/training-plans - Plan cards of the current user
async fn list_plans(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TrainingPlanCardView>>> {
    let cards = TrainingPlanService::list(state.users(), state.plan_mapper(), auth.user_id).await?;
    Ok(Json(cards))
}

/// POST /api/v1/training-plans - Create a plan with empty weeks
async fn create_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTrainingPlanRequest>,
) -> ApiResult<(StatusCode, Json<TrainingPlanEditView>)> {
    let plan =
        TrainingPlanService::create(state.users(), state.plan_mapper(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /api/v1/training-plans/:plan_id
async fn get_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<Json<TrainingPlanEditView>> {
    let plan =
        TrainingPlanService::get(state.users(), state.plan_mapper(), auth.user_id, plan_id).await?;
    Ok(Json(plan))
}

/// PUT /api/v1/training-plans/:plan_id - Save the editor state
async fn update_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(req): Json<UpdateTrainingPlanRequest>,
) -> ApiResult<Json<TrainingPlanEditView>> {
    let plan = TrainingPlanService::update(
        state.users(),
        state.plan_mapper(),
        auth.user_id,
        plan_id,
        req,
    )
    .await?;
    Ok(Json(plan))
}

/// DELETE /api/v1/training-plans/:plan_id
async fn delete_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    TrainingPlanService::delete(state.users(), auth.user_id, plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/training-plans/:plan_id/weeks - Append a week
async fn add_week(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<Json<TrainingPlanEditView>> {
    let plan =
        TrainingPlanService::add_week(state.users(), state.plan_mapper(), auth.user_id, plan_id)
            .await?;
    Ok(Json(plan))
}

/// DELETE /api/v1/training-plans/:plan_id/weeks/:week
async fn remove_week(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((plan_id, week)): Path<(Uuid, usize)>,
) -> ApiResult<Json<TrainingPlanEditView>> {
    let plan = TrainingPlanService::remove_week(
        state.users(),
        state.plan_mapper(),
        auth.user_id,
        plan_id,
        week,
    )
    .await?;
    Ok(Json(plan))
}

/// GET /api/v1/training-plans/:plan_id/weeks/:week/days/:day - Day with weight recommendations
async fn get_day(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((plan_id, week, day)): Path<(Uuid, usize, usize)>,
) -> ApiResult<Json<TrainingDayResponse>> {
    let day = TrainingPlanService::get_day(state.users(), auth.user_id, plan_id, week, day).await?;
    Ok(Json(day))
}

/// PUT /api/v1/training-plans/:plan_id/weeks/:week/days/:day - Replace a day's exercises
async fn update_day(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((plan_id, week, day)): Path<(Uuid, usize, usize)>,
    Json(req): Json<UpdateTrainingDayRequest>,
) -> ApiResult<Json<TrainingDayResponse>> {
    let day = TrainingPlanService::update_day(
        state.users(),
        auth.user_id,
        plan_id,
        week,
        day,
        req.exercises,
    )
    .await?;
    Ok(Json(day))
}
