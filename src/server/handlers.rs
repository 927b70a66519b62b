use crate::auth::TokenOutcome;
use crate::core::stats::calculate_user_stats;
use crate::models::event::AttendanceEvent;
use crate::models::stats::UserStats;
use crate::server::AppState;
use crate::server::error::ApiError;
use crate::server::extract::{AdminUser, AuthUser, bearer_token};
use crate::server::protocol::{
    CurrentTime, LoginResponse, RecordCreated, RecordDeleted, RecordUpdated, VerifyResponse,
};
use crate::server::validation;
use crate::store::records::RecordMap;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Handler for POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (username, password) = validation::validate_login(&body)?;

    let user = state
        .auth
        .verify_credentials(&username, &password)
        .await
        .map_err(|e| {
            tracing::error!("login failed: {e}");
            ApiError::internal("Login error")
        })?;

    let Some(user) = user else {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials",
        ));
    };

    let token = state.auth.issue_token(&user.username).await.map_err(|e| {
        tracing::error!("token issue failed: {e}");
        ApiError::internal("Login error")
    })?;

    tracing::info!("user {username} logged in");
    Ok(Json(LoginResponse {
        success: true,
        user: user.claims(),
        token,
    }))
}

/// Handler for POST /api/auth/verify
///
/// Reads the Authorization header itself so that "no token at all" can be
/// told apart from "token refused".
pub async fn verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::new(StatusCode::UNAUTHORIZED, "No token provided"))?;

    let outcome = state.auth.verify_token(&token).await.map_err(|e| {
        tracing::error!("token verification failed: {e}");
        ApiError::internal("Verification error")
    })?;

    match outcome {
        TokenOutcome::Valid(claims) => Ok(Json(VerifyResponse {
            valid: true,
            user: claims,
        })),
        TokenOutcome::Expired => Err(ApiError::with_code(
            StatusCode::UNAUTHORIZED,
            "Token expired",
            "token_expired",
        )),
        TokenOutcome::Invalid => Err(ApiError::with_code(
            StatusCode::FORBIDDEN,
            "Invalid token",
            "invalid_token",
        )),
    }
}

/// Handler for GET /api/records
///
/// Admins get the whole document; everyone else gets a single-key map with
/// their own (possibly empty) list.
pub async fn list_records(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<RecordMap>, ApiError> {
    if claims.role.is_admin() {
        let records = state.records.load().await.map_err(|e| {
            tracing::error!("failed to read records: {e}");
            ApiError::internal("Failed to fetch records")
        })?;
        return Ok(Json(records));
    }

    let events = state
        .records
        .user_events(&claims.username)
        .await
        .map_err(|e| {
            tracing::error!("failed to read records: {e}");
            ApiError::internal("Failed to fetch records")
        })?;

    let mut own = RecordMap::new();
    own.insert(claims.username.clone(), events);
    Ok(Json(own))
}

/// Handler for POST /api/records
///
/// Clocks the caller in or out. The timestamp is always taken server-side
/// from the Germany clock; clients only choose the kind.
pub async fn create_record(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<RecordCreated>, ApiError> {
    let kind = validation::validate_record_type(&body)?;
    let timestamp = state.clock.now_iso().await;

    let record = state
        .records
        .add(&claims.username, AttendanceEvent::new(kind, timestamp))
        .await
        .map_err(|e| {
            tracing::error!("failed to append record: {e}");
            ApiError::internal("Error recording time")
        })?;

    tracing::info!("{} clocked {}", claims.username, record.kind.as_str());
    Ok(Json(RecordCreated {
        success: true,
        record,
    }))
}

/// Handler for GET /api/records/time
///
/// Unauthenticated; clients use it to show the official clock before login.
pub async fn current_time(State(state): State<AppState>) -> Json<CurrentTime> {
    Json(CurrentTime {
        current_time: state.clock.now_iso().await,
    })
}

/// Handler for PUT /api/records/{username}/{index} (admin only)
pub async fn update_record(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((username, index)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<RecordUpdated>, ApiError> {
    let index = validation::parse_index(&index)?;
    let event = validation::validate_record_update(&body)?;

    let updated = state
        .records
        .update(&username, index, event)
        .await
        .map_err(|e| {
            tracing::error!("failed to update record: {e}");
            ApiError::internal("Failed to update record")
        })?;

    match updated {
        Some(updated_record) => Ok(Json(RecordUpdated {
            success: true,
            updated_record,
        })),
        None => Err(ApiError::not_found("Record not found")),
    }
}

/// Handler for DELETE /api/records/{username}/{index} (admin only)
///
/// Later events shift down by one, so positions visible to clients change
/// after a removal.
pub async fn delete_record(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((username, index)): Path<(String, String)>,
) -> Result<Json<RecordDeleted>, ApiError> {
    let index = validation::parse_index(&index)?;

    let removed = state
        .records
        .delete(&username, index)
        .await
        .map_err(|e| {
            tracing::error!("failed to delete record: {e}");
            ApiError::internal("Failed to delete record")
        })?;

    if !removed {
        return Err(ApiError::not_found("Record not found"));
    }
    Ok(Json(RecordDeleted { success: true }))
}

/// Handler for GET /api/stats
///
/// Statistics for the caller, or for every user when the caller is an
/// admin. With nothing to report the body is a plain message object.
pub async fn statistics(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let records = state.records.load().await.map_err(|e| {
        tracing::error!("failed to read records: {e}");
        ApiError::internal("Failed to generate statistics")
    })?;

    let mut stats: BTreeMap<String, UserStats> = BTreeMap::new();
    if claims.role.is_admin() {
        for (username, events) in &records {
            stats.insert(username.clone(), calculate_user_stats(username, events));
        }
    } else if let Some(events) = records.get(&claims.username) {
        stats.insert(
            claims.username.clone(),
            calculate_user_stats(&claims.username, events),
        );
    }

    if stats.is_empty() {
        return Ok(Json(json!({ "message": "No statistics available" })));
    }

    let value = serde_json::to_value(&stats).map_err(|e| {
        tracing::error!("failed to serialize statistics: {e}");
        ApiError::internal("Failed to generate statistics")
    })?;
    Ok(Json(value))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
