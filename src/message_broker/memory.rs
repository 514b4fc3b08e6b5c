use super::{EventPublisher, PublishError};
use crate::auction::events::AuctionEvent;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// 발행된 이벤트를 기록하는 인메모리 발행자
#[derive(Default)]
pub struct InMemoryEventPublisher {
    published: Mutex<Vec<AuctionEvent>>,
    unavailable: AtomicBool,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 버스 장애 여부 설정
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 지금까지 발행된 이벤트
    pub async fn published(&self) -> Vec<AuctionEvent> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: &AuctionEvent) -> Result<(), PublishError> {
        if self.unavailable.load(Ordering::SeqCst) {
            warn!(
                "{:<12} --> 버스 장애 모드, 발행 거부: {}",
                "MemBus",
                event.event_type()
            );
            return Err(PublishError::Unavailable("버스 장애 모드".to_string()));
        }

        debug!(
            "{:<12} --> 이벤트 기록: {} id: {}",
            "MemBus",
            event.event_type(),
            event.auction_id()
        );
        self.published.lock().await.push(event.clone());
        Ok(())
    }
}
