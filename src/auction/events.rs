use crate::auction::model::{AuctionRecord, AuctionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 카탈로그 변경 도메인 이벤트
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event_type")]
pub enum AuctionEvent {
    // 경매 생성 이벤트
    AuctionCreated {
        id: Uuid,
        reserve_price: i64,
        seller: String,
        winner: Option<String>,
        sold_amount: Option<i64>,
        current_high_bid: Option<i64>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        auction_end: DateTime<Utc>,
        status: AuctionStatus,
        make: String,
        model: String,
        year: i32,
        color: Option<String>,
        mileage: Option<i32>,
        image_url: Option<String>,
    },
    // 경매 수정 이벤트
    AuctionUpdated {
        id: Uuid,
        make: String,
        model: String,
        year: i32,
        color: Option<String>,
        mileage: Option<i32>,
    },
    // 경매 삭제 이벤트
    AuctionDeleted { id: Uuid },
}

impl AuctionEvent {
    pub fn created(record: &AuctionRecord) -> Self {
        AuctionEvent::AuctionCreated {
            id: record.id,
            reserve_price: record.reserve_price,
            seller: record.seller.clone(),
            winner: record.winner.clone(),
            sold_amount: record.sold_amount,
            current_high_bid: record.current_high_bid,
            created_at: record.created_at,
            updated_at: record.updated_at,
            auction_end: record.auction_end,
            status: record.status,
            make: record.item.make.clone(),
            model: record.item.model.clone(),
            year: record.item.year,
            color: record.item.color.clone(),
            mileage: record.item.mileage,
            image_url: record.item.image_url.clone(),
        }
    }

    pub fn updated(record: &AuctionRecord) -> Self {
        AuctionEvent::AuctionUpdated {
            id: record.id,
            make: record.item.make.clone(),
            model: record.item.model.clone(),
            year: record.item.year,
            color: record.item.color.clone(),
            mileage: record.item.mileage,
        }
    }

    pub fn deleted(id: Uuid) -> Self {
        AuctionEvent::AuctionDeleted { id }
    }

    pub fn auction_id(&self) -> Uuid {
        match self {
            AuctionEvent::AuctionCreated { id, .. }
            | AuctionEvent::AuctionUpdated { id, .. }
            | AuctionEvent::AuctionDeleted { id } => *id,
        }
    }

    /// 메시지 헤더용 이벤트 이름
    pub fn event_type(&self) -> &'static str {
        match self {
            AuctionEvent::AuctionCreated { .. } => "AuctionCreated",
            AuctionEvent::AuctionUpdated { .. } => "AuctionUpdated",
            AuctionEvent::AuctionDeleted { .. } => "AuctionDeleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::Item;

    #[test]
    fn payload_is_tagged_with_event_type() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(AuctionEvent::deleted(id)).unwrap();

        assert_eq!(json["event_type"], "AuctionDeleted");
        assert_eq!(json["id"], id.to_string());
    }

    #[test]
    fn updated_event_carries_item_fields() {
        let now = Utc::now();
        let record = AuctionRecord {
            id: Uuid::new_v4(),
            reserve_price: 1000,
            seller: "test".to_string(),
            winner: None,
            sold_amount: None,
            current_high_bid: None,
            created_at: now,
            updated_at: now,
            auction_end: now,
            status: AuctionStatus::Live,
            item: Item {
                make: "Audi".to_string(),
                model: "R8".to_string(),
                year: 2019,
                color: Some("White".to_string()),
                mileage: Some(5000),
                image_url: None,
            },
        };

        let event = AuctionEvent::updated(&record);
        assert_eq!(event.auction_id(), record.id);
        assert_eq!(event.event_type(), "AuctionUpdated");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["make"], "Audi");
        assert_eq!(json["mileage"], 5000);
        assert!(json.get("seller").is_none());
    }
}
