// region:    --- Imports
use crate::auction::model::{AuctionDto, CreateAuctionDto, UpdateAuctionDto};
use crate::auction::service::AuctionLifecycleService;
use crate::error::AuctionError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Router
/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AuctionLifecycleService>,
    /// 요청자 식별 (인증 계층이 없으므로 설정값)
    pub seller: Arc<str>,
}

/// 라우터 구성
pub fn router(state: AppState) -> Router {
    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/auctions", get(handle_list_auctions).post(handle_create_auction))
        .route(
            "/auctions/:id",
            get(handle_get_auction)
                .put(handle_update_auction)
                .delete(handle_delete_auction),
        )
        .layer(cors)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .with_state(state)
}

// endregion: --- Router

// region:    --- Command Handlers

/// 경매 생성
pub async fn handle_create_auction(
    State(state): State<AppState>,
    input: Result<Json<CreateAuctionDto>, JsonRejection>,
) -> Result<impl IntoResponse, AuctionError> {
    let Json(input) = input.map_err(body_rejection)?;
    info!("{:<12} --> 경매 생성 요청: {:?}", "Command", input);
    let auction = state.service.create_auction(input, &state.seller).await?;
    let location = format!("/auctions/{}", auction.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(AuctionDto::from(&auction)),
    ))
}

/// 경매 수정
pub async fn handle_update_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    patch: Result<Json<UpdateAuctionDto>, JsonRejection>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 경매 수정 요청 id: {}", "Command", id);
    let Json(patch) = patch.map_err(body_rejection)?;
    state.service.update_auction(id, patch).await?;
    Ok(StatusCode::OK)
}

/// 경매 삭제
pub async fn handle_delete_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 경매 삭제 요청 id: {}", "Command", id);
    state.service.delete_auction(id).await?;
    Ok(StatusCode::OK)
}

// 본문 해석 실패는 모두 검증 오류
fn body_rejection(rejection: JsonRejection) -> AuctionError {
    info!("{:<12} --> 요청 본문 해석 실패: {}", "Command", rejection.body_text());
    AuctionError::Validation(rejection.body_text())
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
}

/// 경매 목록 조회
pub async fn handle_list_auctions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 경매 목록 조회 date: {:?}", "HandlerQuery", query.date);
    let since = match query.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_cursor(raw).ok_or_else(|| {
            AuctionError::Validation(format!("date 형식 오류: {}", raw))
        })?),
    };

    let auctions = state.service.list_auctions(since).await?;
    let body: Vec<AuctionDto> = auctions.iter().map(AuctionDto::from).collect();
    Ok(Json(body))
}

/// 경매 조회
pub async fn handle_get_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 경매 조회 id: {}", "HandlerQuery", id);
    let auction = state.service.get_auction(id).await?;
    Ok(Json(AuctionDto::from(&auction)))
}

async fn handle_health() -> &'static str {
    "ok"
}

/// RFC 3339, 오프셋 없는 시각(UTC), 날짜만 허용
fn parse_cursor(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

// endregion: --- Query Handlers
