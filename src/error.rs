use crate::message_broker::PublishError;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// 경매 생명주기 연산 결과 오류
#[derive(Debug, Error)]
pub enum AuctionError {
    /// 입력 형식 오류 (발행 없음)
    #[error("입력값 검증 실패: {0}")]
    Validation(String),

    /// 존재하지 않는 경매 (발행 없음)
    #[error("경매를 찾을 수 없습니다: {0}")]
    NotFound(Uuid),

    /// 이벤트 발행 실패, 저장은 시도하지 않음
    #[error("이벤트 발행 실패: {0}")]
    Publish(#[source] PublishError),

    /// 이벤트 발행 후 저장 실패
    #[error("저장 실패: {0}")]
    Persistence(#[source] StoreError),

    /// 조회 단계 저장소 오류
    #[error("저장소 조회 실패: {0}")]
    Store(#[source] StoreError),
}

impl AuctionError {
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::Validation(_) => "VALIDATION_ERROR",
            AuctionError::NotFound(_) => "NOT_FOUND",
            AuctionError::Publish(_) => "PUBLISH_ERROR",
            AuctionError::Persistence(_) => "PERSISTENCE_ERROR",
            AuctionError::Store(_) => "STORE_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuctionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AuctionError::NotFound(_) => StatusCode::NOT_FOUND,
            AuctionError::Publish(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuctionError::Persistence(_) => StatusCode::BAD_REQUEST,
            AuctionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() || matches!(self, AuctionError::Persistence(_)) {
            error!("{:<12} --> {} ({})", "Error", self, self.code());
        }

        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn status_codes_follow_http_contract() {
        let id = Uuid::new_v4();
        assert_eq!(
            AuctionError::Validation("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AuctionError::NotFound(id).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuctionError::Persistence(StoreError::Conflict(id)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuctionError::Publish(PublishError::Timeout(Duration::from_secs(1))).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AuctionError::Store(StoreError::Timeout(Duration::from_secs(1))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
