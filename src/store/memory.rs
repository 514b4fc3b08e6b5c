use super::{AuctionStore, PatchFn, StoreError};
use crate::auction::model::{advance_timestamp, AuctionRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// 인메모리 경매 저장소
///
/// 쓰기 락 하나가 원자 단위다. `fail_writes`로 쓰기 장애를 흉내 낼 수 있다.
#[derive(Default)]
pub struct InMemoryAuctionStore {
    records: RwLock<HashMap<Uuid, AuctionRecord>>,
    fail_writes: AtomicBool,
}

impl InMemoryAuctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이후 쓰기 연산 실패 여부 설정
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            warn!("{:<12} --> 쓰기 장애 모드", "MemStore");
            return Err(StoreError::Unavailable("쓰기 장애 모드".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AuctionStore for InMemoryAuctionStore {
    async fn list(&self, since: Option<DateTime<Utc>>) -> Result<Vec<AuctionRecord>, StoreError> {
        let records = self.records.read().await;
        let mut listed: Vec<AuctionRecord> = records
            .values()
            .filter(|record| since.map_or(true, |since| record.updated_at > since))
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.item.make.cmp(&b.item.make));
        Ok(listed)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<AuctionRecord, StoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, record: &AuctionRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(StoreError::Conflict(record.id));
        }
        records.insert(record.id, record.clone());
        debug!("{:<12} --> 경매 저장 id: {}", "MemStore", record.id);
        Ok(())
    }

    async fn mutate(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        patch: PatchFn,
    ) -> Result<AuctionRecord, StoreError> {
        self.check_writable()?;
        let mut records = self.records.write().await;
        let stored = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        // 사본에 적용 후 교체해 부분 상태가 보이지 않게 한다
        let mut next = stored.clone();
        patch(&mut next);
        next.id = id;
        next.updated_at = advance_timestamp(Some(stored.updated_at), at);
        *stored = next.clone();

        debug!("{:<12} --> 경매 수정 id: {}", "MemStore", id);
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.check_writable()?;
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::{AuctionStatus, Item};
    use chrono::Duration;

    fn record(make: &str, updated_at: DateTime<Utc>) -> AuctionRecord {
        AuctionRecord {
            id: Uuid::new_v4(),
            reserve_price: 0,
            seller: "test".to_string(),
            winner: None,
            sold_amount: None,
            current_high_bid: None,
            created_at: updated_at,
            updated_at,
            auction_end: updated_at + Duration::days(7),
            status: AuctionStatus::Live,
            item: Item {
                make: make.to_string(),
                model: "Model".to_string(),
                year: 2020,
                color: None,
                mileage: None,
                image_url: None,
            },
        }
    }

    #[tokio::test]
    async fn list_filters_by_cursor_and_orders_by_make() {
        let store = InMemoryAuctionStore::new();
        let base = Utc::now();
        store.insert(&record("Ford", base)).await.unwrap();
        store
            .insert(&record("Audi", base + Duration::seconds(2)))
            .await
            .unwrap();
        store
            .insert(&record("Bmw", base + Duration::seconds(3)))
            .await
            .unwrap();

        let all = store.list(None).await.unwrap();
        let makes: Vec<_> = all.iter().map(|r| r.item.make.as_str()).collect();
        assert_eq!(makes, ["Audi", "Bmw", "Ford"]);

        let since = store.list(Some(base)).await.unwrap();
        let makes: Vec<_> = since.iter().map(|r| r.item.make.as_str()).collect();
        assert_eq!(makes, ["Audi", "Bmw"]);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_conflict() {
        let store = InMemoryAuctionStore::new();
        let rec = record("Ford", Utc::now());
        store.insert(&rec).await.unwrap();

        let err = store.insert(&rec).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == rec.id));
    }

    #[tokio::test]
    async fn mutate_advances_timestamp_even_with_stale_clock() {
        let store = InMemoryAuctionStore::new();
        let now = Utc::now();
        let rec = record("Ford", now);
        store.insert(&rec).await.unwrap();

        let updated = store
            .mutate(
                rec.id,
                now - Duration::seconds(10),
                Box::new(|r: &mut AuctionRecord| r.item.model = "Focus".to_string()),
            )
            .await
            .unwrap();

        assert!(updated.updated_at > rec.updated_at);
        assert_eq!(store.get_by_id(rec.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn failing_writes_leave_state_untouched() {
        let store = InMemoryAuctionStore::new();
        let rec = record("Ford", Utc::now());
        store.insert(&rec).await.unwrap();
        store.fail_writes(true);

        assert!(store.delete(rec.id).await.is_err());
        assert!(store
            .mutate(rec.id, Utc::now(), Box::new(|r: &mut AuctionRecord| r.item.year = 1999))
            .await
            .is_err());
        assert_eq!(store.get_by_id(rec.id).await.unwrap(), rec);
    }

    #[tokio::test]
    async fn missing_ids_report_not_found() {
        let store = InMemoryAuctionStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(store.get_by_id(id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete(id).await, Err(StoreError::NotFound(_))));
    }
}
