// src/handlers/events.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::event::{EventStats, EventStatsQuery},
};

// GET /api/events/stats
#[utoipa::path(
    get,
    path = "/api/events/stats",
    tag = "Events",
    params(
        ("indicationId" = Option<uuid::Uuid>, Query, description = "Restringe a um link"),
        ("from" = Option<String>, Query, description = "Início (RFC 3339)"),
        ("to" = Option<String>, Query, description = "Fim, exclusivo (RFC 3339)")
    ),
    responses((status = 200, description = "Cliques, leads e conversão", body = EventStats)),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<EventStatsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let counts = app_state
        .event_repo
        .count_by_type(user.id, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let by_source = app_state
        .event_repo
        .leads_by_source(user.id, &query)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(EventStats::from_counts(&counts, by_source))))
}
