//! 경매 생명주기 서비스
//! 1. 생성
//! 2. 수정 (부분 패치)
//! 3. 삭제
//! 4. 조회
//!
//! 쓰기 연산은 항상 "검증/조회 → 메모리 상 변경 → 이벤트 발행 → 저장소 커밋" 순서를 따른다.
//! 저장소와 메시지 버스 사이에는 공유 트랜잭션이 없다. 발행 후 커밋이 실패하면
//! 이미 나간 이벤트는 되돌리지 않고 PersistenceError로 응답한다.

// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::auction::model::{advance_timestamp, AuctionRecord, CreateAuctionDto, UpdateAuctionDto};
use crate::error::AuctionError;
use crate::message_broker::{EventPublisher, PublishError};
use crate::store::{AuctionStore, StoreError};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{info, warn};
use uuid::Uuid;

// endregion: --- Imports

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_AUCTION_DAYS: i64 = 7;

// region:    --- Auction Lifecycle Service
pub struct AuctionLifecycleService {
    store: Arc<dyn AuctionStore>,
    publisher: Arc<dyn EventPublisher>,
    store_timeout: Duration,
    publish_timeout: Duration,
    default_duration: chrono::Duration,
}

impl AuctionLifecycleService {
    pub fn new(store: Arc<dyn AuctionStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            publisher,
            store_timeout: DEFAULT_CALL_TIMEOUT,
            publish_timeout: DEFAULT_CALL_TIMEOUT,
            default_duration: chrono::Duration::days(DEFAULT_AUCTION_DAYS),
        }
    }

    /// 저장소/발행 호출 제한 시간 설정
    pub fn with_timeouts(mut self, store_timeout: Duration, publish_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self.publish_timeout = publish_timeout;
        self
    }

    /// auction_end 미지정 시 경매 기간
    pub fn with_default_days(mut self, days: i64) -> Self {
        self.default_duration = chrono::Duration::days(days);
        self
    }

    /// 1. 생성
    pub async fn create_auction(
        &self,
        input: CreateAuctionDto,
        seller: &str,
    ) -> Result<AuctionRecord, AuctionError> {
        info!(
            "{:<12} --> 경매 생성 요청: {} {} seller={}",
            "Lifecycle", input.make, input.model, seller
        );
        let now = Utc::now();
        input.validate(now).map_err(AuctionError::Validation)?;

        let now = advance_timestamp(None, now);
        let auction = input.into_record(Uuid::new_v4(), seller, now, self.default_duration);

        // 커밋 전에 발행
        self.publish(AuctionEvent::created(&auction)).await?;

        self.store_call(self.store.insert(&auction))
            .await
            .map_err(|e| self.persistence_failure(auction.id, e))?;

        info!("{:<12} --> 경매 생성 완료 id: {}", "Lifecycle", auction.id);
        Ok(auction)
    }

    /// 2. 수정 (값이 있는 필드만 덮어씀)
    pub async fn update_auction(
        &self,
        id: Uuid,
        patch: UpdateAuctionDto,
    ) -> Result<AuctionRecord, AuctionError> {
        info!("{:<12} --> 경매 수정 요청 id: {}", "Lifecycle", id);
        let now = Utc::now();
        patch.validate(now).map_err(AuctionError::Validation)?;

        let mut auction = self.load(id).await?;
        if !patch.apply_to(&mut auction.item) {
            info!("{:<12} --> 변경 사항 없음, 발행 생략 id: {}", "Lifecycle", id);
            return Ok(auction);
        }
        let at = advance_timestamp(Some(auction.updated_at), now);
        auction.updated_at = at;

        self.publish(AuctionEvent::updated(&auction)).await?;

        let committed = self
            .store_call(self.store.mutate(
                id,
                at,
                Box::new(move |stored: &mut AuctionRecord| {
                    patch.apply_to(&mut stored.item);
                }),
            ))
            .await
            .map_err(|e| self.persistence_failure(id, e))?;

        info!(
            "{:<12} --> 경매 수정 완료 id: {}, updated_at: {}",
            "Lifecycle", id, committed.updated_at
        );
        Ok(committed)
    }

    /// 3. 삭제
    pub async fn delete_auction(&self, id: Uuid) -> Result<(), AuctionError> {
        info!("{:<12} --> 경매 삭제 요청 id: {}", "Lifecycle", id);
        let auction = self.load(id).await?;

        self.publish(AuctionEvent::deleted(auction.id)).await?;

        self.store_call(self.store.delete(auction.id))
            .await
            .map_err(|e| self.persistence_failure(id, e))?;

        info!("{:<12} --> 경매 삭제 완료 id: {}", "Lifecycle", id);
        Ok(())
    }

    /// 4-1. 단건 조회
    pub async fn get_auction(&self, id: Uuid) -> Result<AuctionRecord, AuctionError> {
        self.load(id).await
    }

    /// 4-2. 목록 조회 (since 이후 수정분, make 오름차순)
    pub async fn list_auctions(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<AuctionRecord>, AuctionError> {
        self.store_call(self.store.list(since))
            .await
            .map_err(AuctionError::Store)
    }

    async fn load(&self, id: Uuid) -> Result<AuctionRecord, AuctionError> {
        match self.store_call(self.store.get_by_id(id)).await {
            Ok(auction) => Ok(auction),
            Err(StoreError::NotFound(_)) => {
                info!("{:<12} --> 경매 없음 id: {}", "Lifecycle", id);
                Err(AuctionError::NotFound(id))
            }
            Err(e) => Err(AuctionError::Store(e)),
        }
    }

    async fn publish(&self, event: AuctionEvent) -> Result<(), AuctionError> {
        match time::timeout(self.publish_timeout, self.publisher.publish(&event)).await {
            Ok(Ok(())) => {
                info!(
                    "{:<12} --> 이벤트 발행: {} id: {}",
                    "Lifecycle",
                    event.event_type(),
                    event.auction_id()
                );
                Ok(())
            }
            Ok(Err(e)) => {
                warn!("{:<12} --> 이벤트 발행 실패, 저장 생략: {}", "Lifecycle", e);
                Err(AuctionError::Publish(e))
            }
            Err(_) => {
                warn!(
                    "{:<12} --> 이벤트 발행 시간 초과, 저장 생략: {:?}",
                    "Lifecycle", self.publish_timeout
                );
                Err(AuctionError::Publish(PublishError::Timeout(
                    self.publish_timeout,
                )))
            }
        }
    }

    async fn store_call<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.store_timeout))?
    }

    // 이벤트는 이미 나간 상태
    fn persistence_failure(&self, id: Uuid, e: StoreError) -> AuctionError {
        warn!(
            "{:<12} --> 발행 후 저장 실패 id: {}, 이벤트는 이미 발행됨: {}",
            "Lifecycle", id, e
        );
        AuctionError::Persistence(e)
    }
}

// endregion: --- Auction Lifecycle Service
