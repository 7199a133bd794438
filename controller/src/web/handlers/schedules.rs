// Drain schedule endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::common::{api_error, ApiResponse, ApiResult, StaleQuery};
use crate::errors::DrainError;
use crate::scheduler::ScheduleSummary;
use crate::web::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleStatus {
    pub node_name: String,
    pub exists: bool,
    pub failed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduledDrain {
    pub node_name: String,
    pub when: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StaleStatus {
    pub node_name: String,
    pub since: DateTime<Utc>,
    pub stale: bool,
}

/// List every tracked schedule, earliest first
pub async fn list_schedules(State(state): State<AppState>) -> ApiResult<Vec<ScheduleSummary>> {
    Ok(Json(ApiResponse::success(
        state.scheduler.list_schedules().await,
    )))
}

pub async fn get_schedule(
    Path(node_name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<ScheduleStatus> {
    let (exists, failed) = state.scheduler.has_schedule(&node_name).await;
    Ok(Json(ApiResponse::success(ScheduleStatus {
        node_name,
        exists,
        failed,
    })))
}

/// Schedule a drain for a node from the inventory
pub async fn create_schedule(
    Path(node_name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<ScheduledDrain> {
    let node = state.config.node(&node_name).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            format!("Node {} not found or disabled", node_name),
        )
    })?;

    info!("Drain schedule requested for {}", node_name);

    match state.scheduler.schedule(&node).await {
        Ok(when) => Ok(Json(ApiResponse::success(ScheduledDrain { node_name, when }))),
        Err(e @ DrainError::AlreadyScheduled { .. }) => {
            warn!("{}", e);
            Err(api_error(StatusCode::CONFLICT, e.to_string()))
        }
        Err(e @ DrainError::Announcement { .. }) => {
            error!("{}", e);
            Err(api_error(StatusCode::BAD_GATEWAY, e.to_string()))
        }
        Err(e @ DrainError::InvalidNode { .. }) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            error!("Unexpected scheduling error for {}: {}", node_name, e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn delete_schedule(
    Path(node_name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Value> {
    info!("Drain schedule deletion requested for {}", node_name);
    state.scheduler.delete_schedule(&node_name).await;
    Ok(Json(ApiResponse::success(json!({
        "message": format!("Drain schedule removed for {}", node_name)
    }))))
}

/// Whether the node's completed drain was planned before `since`
pub async fn check_stale_schedule(
    Path(node_name): Path<String>,
    Query(query): Query<StaleQuery>,
    State(state): State<AppState>,
) -> ApiResult<StaleStatus> {
    let stale = state
        .scheduler
        .is_scheduled_by_old_event(&node_name, query.since)
        .await;
    Ok(Json(ApiResponse::success(StaleStatus {
        node_name,
        since: query.since,
        stale,
    })))
}
