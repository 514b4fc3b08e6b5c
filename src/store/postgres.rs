// region:    --- Imports
use super::{queries, AuctionStore, PatchFn, StoreError};
use crate::auction::model::{advance_timestamp, AuctionRecord, AuctionStatus, Item};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

// endregion: --- Imports

// region:    --- Row Model
/// auctions 테이블 행
#[derive(Debug, FromRow)]
struct AuctionRow {
    id: Uuid,
    reserve_price: i64,
    seller: String,
    winner: Option<String>,
    sold_amount: Option<i64>,
    current_high_bid: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    auction_end: DateTime<Utc>,
    status: String,
    make: String,
    model: String,
    year: i32,
    color: Option<String>,
    mileage: Option<i32>,
    image_url: Option<String>,
}

impl TryFrom<AuctionRow> for AuctionRecord {
    type Error = StoreError;

    fn try_from(row: AuctionRow) -> Result<Self, Self::Error> {
        let status = AuctionStatus::parse(&row.status).ok_or_else(|| {
            StoreError::Decode(format!("알 수 없는 상태 {} (id={})", row.status, row.id))
        })?;

        Ok(AuctionRecord {
            id: row.id,
            reserve_price: row.reserve_price,
            seller: row.seller,
            winner: row.winner,
            sold_amount: row.sold_amount,
            current_high_bid: row.current_high_bid,
            created_at: row.created_at,
            updated_at: row.updated_at,
            auction_end: row.auction_end,
            status,
            item: Item {
                make: row.make,
                model: row.model,
                year: row.year,
                color: row.color,
                mileage: row.mileage,
                image_url: row.image_url,
            },
        })
    }
}

// endregion: --- Row Model

// region:    --- Postgres Auction Store
/// PostgreSQL 경매 저장소
pub struct PostgresAuctionStore {
    pool: Arc<PgPool>,
}

impl PostgresAuctionStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuctionStore for PostgresAuctionStore {
    async fn list(&self, since: Option<DateTime<Utc>>) -> Result<Vec<AuctionRecord>, StoreError> {
        info!("{:<12} --> 경매 목록 조회 since: {:?}", "Store", since);
        let rows = match since {
            Some(since) => {
                sqlx::query_as::<_, AuctionRow>(queries::LIST_AUCTIONS_SINCE)
                    .bind(since)
                    .fetch_all(&*self.pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, AuctionRow>(queries::LIST_AUCTIONS)
                    .fetch_all(&*self.pool)
                    .await?
            }
        };

        rows.into_iter().map(AuctionRecord::try_from).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<AuctionRecord, StoreError> {
        info!("{:<12} --> 경매 조회 id: {}", "Store", id);
        let row = sqlx::query_as::<_, AuctionRow>(queries::GET_AUCTION)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        AuctionRecord::try_from(row)
    }

    async fn insert(&self, record: &AuctionRecord) -> Result<(), StoreError> {
        info!("{:<12} --> 경매 저장 id: {}", "Store", record.id);
        sqlx::query(queries::INSERT_AUCTION)
            .bind(record.id)
            .bind(record.reserve_price)
            .bind(&record.seller)
            .bind(&record.winner)
            .bind(record.sold_amount)
            .bind(record.current_high_bid)
            .bind(record.created_at)
            .bind(record.updated_at)
            .bind(record.auction_end)
            .bind(record.status.as_str())
            .bind(&record.item.make)
            .bind(&record.item.model)
            .bind(record.item.year)
            .bind(&record.item.color)
            .bind(record.item.mileage)
            .bind(&record.item.image_url)
            .execute(&*self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    StoreError::Conflict(record.id)
                }
                other => StoreError::Database(other),
            })?;

        Ok(())
    }

    async fn mutate(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        patch: PatchFn,
    ) -> Result<AuctionRecord, StoreError> {
        info!("{:<12} --> 경매 수정 id: {}", "Store", id);

        // 트랜잭션 시작
        let mut tx = self.pool.begin().await?;

        // 행 잠금 후 현재 상태 조회
        let row = sqlx::query_as::<_, AuctionRow>(queries::GET_AUCTION_FOR_UPDATE)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(StoreError::NotFound(id));
        };

        let mut record = AuctionRecord::try_from(row)?;
        let previous = record.updated_at;
        patch(&mut record);
        record.id = id;
        record.updated_at = advance_timestamp(Some(previous), at);

        sqlx::query(queries::UPDATE_AUCTION)
            .bind(id)
            .bind(record.reserve_price)
            .bind(&record.seller)
            .bind(&record.winner)
            .bind(record.sold_amount)
            .bind(record.current_high_bid)
            .bind(record.updated_at)
            .bind(record.auction_end)
            .bind(record.status.as_str())
            .bind(&record.item.make)
            .bind(&record.item.model)
            .bind(record.item.year)
            .bind(&record.item.color)
            .bind(record.item.mileage)
            .bind(&record.item.image_url)
            .execute(&mut *tx)
            .await?;

        // 트랜잭션 커밋
        tx.commit().await?;
        debug!(
            "{:<12} --> 경매 수정 완료 id: {}, updated_at: {}",
            "Store", id, record.updated_at
        );

        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        info!("{:<12} --> 경매 삭제 id: {}", "Store", id);
        let result = sqlx::query(queries::DELETE_AUCTION)
            .bind(id)
            .execute(&*self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

// endregion: --- Postgres Auction Store
