use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use application::{parse_limit, JoinRequest, MessageDto, ParticipantDto, SendMessageRequest};

use crate::{error::ApiError, identity::UserHeader, state::AppState};

#[derive(Debug, Deserialize)]
struct JoinPayload {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendMessagePayload {
    to: Option<String>,
    text: Option<String>,
    // 兼容旧客户端的 `type` 字段
    #[serde(alias = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/participants", get(list_participants).post(join))
        .route("/messages", get(list_messages).post(send_message))
        .route("/status", post(heartbeat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `*` 表示允许任意来源
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<ParticipantDto>>, ApiError> {
    let participants = state.presence_service.list().await?;
    Ok(Json(participants.iter().map(ParticipantDto::from).collect()))
}

async fn join(
    State(state): State<AppState>,
    payload: Result<Json<JoinPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    state
        .presence_service
        .join(JoinRequest {
            name: payload.name.unwrap_or_default(),
        })
        .await?;

    Ok(StatusCode::CREATED)
}

async fn send_message(
    State(state): State<AppState>,
    UserHeader(user): UserHeader,
    payload: Result<Json<SendMessagePayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(payload) = payload?;
    state
        .message_service
        .send(SendMessageRequest {
            from: user,
            to: payload.to,
            text: payload.text,
            kind: payload.kind,
        })
        .await?;

    Ok(StatusCode::CREATED)
}

async fn list_messages(
    State(state): State<AppState>,
    user: UserHeader,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let limit = parse_limit(query.limit.as_deref());
    let messages = state
        .message_service
        .list_visible_to(user.as_deref(), limit)
        .await?;

    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

async fn heartbeat(
    State(state): State<AppState>,
    UserHeader(user): UserHeader,
) -> Result<StatusCode, ApiError> {
    state
        .presence_service
        .heartbeat(user.as_deref().unwrap_or_default())
        .await?;

    Ok(StatusCode::OK)
}
