//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::auth::{clear_session_cookie, session_cookie, CurrentUser};
use super::dto::{
    CalculateQuery, EntryFilter, EntryListResponse, HealthResponse, LoginRequest, LoginResponse,
    OeeCalculation, RejectRequest, UserListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    AnalyticsSummary, DailyTrendPoint, DashboardData, EntryId, EntryOee, EntryWithOee,
    LinePerformance, ModelPerformance, NewEntry, NewUser, ShiftAnalytics, User, UserId,
    UserUpdate,
};
use crate::db::services::{self as db_services, ReviewDecision};
use crate::services::oee::{calculate_oee, get_oee_category};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Auth
// =============================================================================

/// POST /v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let (session, user) = db_services::login(
        state.repository.as_ref(),
        &request.username,
        &request.password,
        Utc::now(),
        state.session_ttl,
    )
    .await?;

    let cookie = session_cookie(&session.token, state.session_ttl.num_seconds())?;
    let body = LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
    };
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, AppError> {
    db_services::logout(state.repository.as_ref(), &current.token).await?;
    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie())],
    )
        .into_response())
}

/// GET /v1/auth/me
pub async fn me(current: CurrentUser) -> HandlerResult<User> {
    Ok(Json(current.user))
}

// =============================================================================
// Entries
// =============================================================================

/// GET /v1/entries
///
/// Entries visible to the caller, each with its OEE breakdown.
pub async fn list_entries(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(filter): Query<EntryFilter>,
) -> HandlerResult<EntryListResponse> {
    let entries =
        db_services::list_entries(state.repository.as_ref(), &current.user, filter).await?;
    let entries: Vec<EntryWithOee> = entries
        .into_iter()
        .map(db_services::entry_with_oee)
        .collect();
    let total = entries.len();

    Ok(Json(EntryListResponse { entries, total }))
}

/// POST /v1/entries
pub async fn create_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(new): Json<NewEntry>,
) -> Result<(StatusCode, Json<EntryWithOee>), AppError> {
    let entry =
        db_services::submit_entry(state.repository.as_ref(), &current.user, new, Utc::now())
            .await?;
    Ok((StatusCode::CREATED, Json(db_services::entry_with_oee(entry))))
}

/// GET /v1/entries/{entry_id}
pub async fn get_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(entry_id): Path<i64>,
) -> HandlerResult<EntryWithOee> {
    let entry =
        db_services::get_entry(state.repository.as_ref(), &current.user, EntryId::new(entry_id))
            .await?;
    Ok(Json(db_services::entry_with_oee(entry)))
}

/// PUT /v1/entries/{entry_id}
pub async fn update_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(entry_id): Path<i64>,
    Json(new): Json<NewEntry>,
) -> HandlerResult<EntryWithOee> {
    let entry = db_services::edit_entry(
        state.repository.as_ref(),
        &current.user,
        EntryId::new(entry_id),
        new,
        Utc::now(),
    )
    .await?;
    Ok(Json(db_services::entry_with_oee(entry)))
}

/// DELETE /v1/entries/{entry_id}
pub async fn delete_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(entry_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_entry(state.repository.as_ref(), &current.user, EntryId::new(entry_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/entries/{entry_id}/oee
pub async fn get_entry_oee(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(entry_id): Path<i64>,
) -> HandlerResult<EntryOee> {
    let oee = db_services::get_entry_oee(
        state.repository.as_ref(),
        &current.user,
        EntryId::new(entry_id),
    )
    .await?;
    Ok(Json(oee))
}

/// POST /v1/entries/{entry_id}/approve
pub async fn approve_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(entry_id): Path<i64>,
) -> HandlerResult<EntryWithOee> {
    let entry = db_services::review_entry(
        state.repository.as_ref(),
        &current.user,
        EntryId::new(entry_id),
        ReviewDecision::Approve,
        Utc::now(),
    )
    .await?;
    Ok(Json(db_services::entry_with_oee(entry)))
}

/// POST /v1/entries/{entry_id}/reject
///
/// The body is optional; `{"reason": "..."}` records why.
pub async fn reject_entry(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(entry_id): Path<i64>,
    body: Bytes,
) -> HandlerResult<EntryWithOee> {
    let reason = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice::<RejectRequest>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid reject body: {}", e)))?
            .reason
    };
    let entry = db_services::review_entry(
        state.repository.as_ref(),
        &current.user,
        EntryId::new(entry_id),
        ReviewDecision::Reject { reason },
        Utc::now(),
    )
    .await?;
    Ok(Json(db_services::entry_with_oee(entry)))
}

// =============================================================================
// Analytics
// =============================================================================

/// GET /v1/analytics/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> HandlerResult<DashboardData> {
    let dashboard =
        db_services::dashboard(state.repository.as_ref(), Utc::now(), &state.windows).await?;
    Ok(Json(dashboard))
}

/// GET /v1/analytics/summary
pub async fn get_summary(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> HandlerResult<AnalyticsSummary> {
    Ok(Json(db_services::summary(state.repository.as_ref()).await?))
}

/// GET /v1/analytics/lines
pub async fn get_line_performance(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> HandlerResult<Vec<LinePerformance>> {
    let lines =
        db_services::line_performance(state.repository.as_ref(), Utc::now(), &state.windows)
            .await?;
    Ok(Json(lines))
}

/// GET /v1/analytics/shifts
pub async fn get_shift_analytics(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> HandlerResult<Vec<ShiftAnalytics>> {
    let shifts =
        db_services::shift_analytics(state.repository.as_ref(), Utc::now(), &state.windows)
            .await?;
    Ok(Json(shifts))
}

/// GET /v1/analytics/models
pub async fn get_model_performance(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> HandlerResult<Vec<ModelPerformance>> {
    let models =
        db_services::model_performance(state.repository.as_ref(), Utc::now(), &state.windows)
            .await?;
    Ok(Json(models))
}

/// GET /v1/analytics/daily-trend
pub async fn get_daily_trend(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> HandlerResult<Vec<DailyTrendPoint>> {
    let trend =
        db_services::daily_trend(state.repository.as_ref(), Utc::now(), &state.windows).await?;
    Ok(Json(trend))
}

/// GET /v1/oee/calculate
///
/// Stateless calculator used by the entry form preview.
pub async fn calculate(Query(query): Query<CalculateQuery>) -> HandlerResult<OeeCalculation> {
    let (available, loss, capacity, good, rejects) = query.counts();
    let metrics = calculate_oee(available, loss, capacity, good, rejects);
    Ok(Json(OeeCalculation {
        category: get_oee_category(metrics.oee),
        metrics,
    }))
}

// =============================================================================
// Users
// =============================================================================

/// GET /v1/users
pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
) -> HandlerResult<UserListResponse> {
    let users = db_services::list_users(state.repository.as_ref(), &current.user).await?;
    let total = users.len();
    Ok(Json(UserListResponse { users, total }))
}

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(new): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user =
        db_services::create_user(state.repository.as_ref(), &current.user, new, Utc::now())
            .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /v1/users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> HandlerResult<User> {
    let user = db_services::update_user(
        state.repository.as_ref(),
        &current.user,
        UserId::new(user_id),
        update,
    )
    .await?;
    Ok(Json(user))
}

/// DELETE /v1/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_user(state.repository.as_ref(), &current.user, UserId::new(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
