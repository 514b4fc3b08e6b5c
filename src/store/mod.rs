//! 경매 레코드 저장소
//! 1. PostgreSQL 구현체
//! 2. 인메모리 구현체 (테스트 및 로컬 실행용)

// region:    --- Imports
use crate::auction::model::AuctionRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Modules
mod memory;
mod postgres;
pub mod queries;

pub use memory::InMemoryAuctionStore;
pub use postgres::PostgresAuctionStore;

// endregion: --- Modules

// region:    --- Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("경매 없음: {0}")]
    NotFound(Uuid),

    #[error("중복된 경매 id: {0}")]
    Conflict(Uuid),

    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),

    #[error("저장된 레코드 해석 실패: {0}")]
    Decode(String),

    #[error("저장소 응답 시간 초과 ({0:?})")]
    Timeout(Duration),

    #[error("저장소 사용 불가: {0}")]
    Unavailable(String),
}

// endregion: --- Store Error

// region:    --- Auction Store Trait
/// 저장된 레코드에 적용할 병합 함수
pub type PatchFn = Box<dyn FnOnce(&mut AuctionRecord) + Send>;

/// 경매 저장소 트레이트
///
/// 상태를 바꾸는 연산은 같은 원자 단위 안에서 updated_at도 함께 전진시킨다.
#[async_trait]
pub trait AuctionStore: Send + Sync {
    /// since 이후 수정된 레코드를 make 오름차순으로 조회
    async fn list(&self, since: Option<DateTime<Utc>>) -> Result<Vec<AuctionRecord>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<AuctionRecord, StoreError>;

    async fn insert(&self, record: &AuctionRecord) -> Result<(), StoreError>;

    /// 레코드 잠금 후 patch 적용, updated_at을 at(또는 이전 값 + 1µs)으로 전진
    async fn mutate(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        patch: PatchFn,
    ) -> Result<AuctionRecord, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

// endregion: --- Auction Store Trait
