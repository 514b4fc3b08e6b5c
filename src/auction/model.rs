use chrono::{DateTime, Datelike, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// region:    --- Auction Model

/// 경매 상태
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStatus {
    Live,
    Finished,
    ReserveNotMet,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Live => "Live",
            AuctionStatus::Finished => "Finished",
            AuctionStatus::ReserveNotMet => "ReserveNotMet",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Live" => Some(AuctionStatus::Live),
            "Finished" => Some(AuctionStatus::Finished),
            "ReserveNotMet" => Some(AuctionStatus::ReserveNotMet),
            _ => None,
        }
    }
}

/// 경매 대상 차량
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Item {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub image_url: Option<String>,
}

/// 경매 레코드
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuctionRecord {
    pub id: Uuid,
    pub reserve_price: i64,
    pub seller: String,
    pub winner: Option<String>,
    pub sold_amount: Option<i64>,
    pub current_high_bid: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub auction_end: DateTime<Utc>,
    pub status: AuctionStatus,
    pub item: Item,
}

/// 다음 updated_at 계산
///
/// 저장소 정밀도(마이크로초)로 자른 현재 시각을 사용하되, 이전 값보다 반드시 커야 한다.
pub fn advance_timestamp(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = now.trunc_subsecs(6);
    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

// endregion: --- Auction Model

// region:    --- DTOs

/// 경매 생성 요청
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CreateAuctionDto {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub reserve_price: i64,
    pub auction_end: Option<DateTime<Utc>>,
}

impl CreateAuctionDto {
    /// 입력값 검증 (부수 효과 없음)
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.make.trim().is_empty() {
            problems.push("make는 비어 있을 수 없습니다".to_string());
        }
        if self.model.trim().is_empty() {
            problems.push("model은 비어 있을 수 없습니다".to_string());
        }
        if let Some(problem) = check_year(self.year, now) {
            problems.push(problem);
        }
        if matches!(self.mileage, Some(m) if m < 0) {
            problems.push("mileage는 0 이상이어야 합니다".to_string());
        }
        if self.reserve_price < 0 {
            problems.push("reserve_price는 0 이상이어야 합니다".to_string());
        }
        if matches!(self.auction_end, Some(end) if end <= now) {
            problems.push("auction_end는 현재 이후여야 합니다".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join(", "))
        }
    }

    /// 새 레코드 구성
    pub fn into_record(
        self,
        id: Uuid,
        seller: &str,
        now: DateTime<Utc>,
        default_duration: Duration,
    ) -> AuctionRecord {
        AuctionRecord {
            id,
            reserve_price: self.reserve_price,
            seller: seller.to_string(),
            winner: None,
            sold_amount: None,
            current_high_bid: None,
            created_at: now,
            updated_at: now,
            auction_end: self
                .auction_end
                .map(|end| end.trunc_subsecs(6))
                .unwrap_or(now + default_duration),
            status: AuctionStatus::Live,
            item: Item {
                make: self.make.trim().to_string(),
                model: self.model.trim().to_string(),
                year: self.year,
                color: self.color,
                mileage: self.mileage,
                image_url: self.image_url,
            },
        }
    }
}

/// 경매 수정 요청 (부분 패치)
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UpdateAuctionDto {
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub year: Option<i32>,
}

impl UpdateAuctionDto {
    /// 패치 형식 검증
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), String> {
        let mut problems = Vec::new();

        if matches!(&self.make, Some(make) if make.trim().is_empty()) {
            problems.push("make는 비어 있을 수 없습니다".to_string());
        }
        if matches!(&self.model, Some(model) if model.trim().is_empty()) {
            problems.push("model은 비어 있을 수 없습니다".to_string());
        }
        if let Some(problem) = self.year.and_then(|year| check_year(year, now)) {
            problems.push(problem);
        }
        if matches!(self.mileage, Some(m) if m < 0) {
            problems.push("mileage는 0 이상이어야 합니다".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join(", "))
        }
    }

    /// 값이 있는 필드만 덮어쓴다. 변경 여부 반환
    pub fn apply_to(&self, item: &mut Item) -> bool {
        let before = item.clone();

        if let Some(make) = &self.make {
            item.make = make.trim().to_string();
        }
        if let Some(model) = &self.model {
            item.model = model.trim().to_string();
        }
        if let Some(color) = &self.color {
            item.color = Some(color.clone());
        }
        if let Some(mileage) = self.mileage {
            item.mileage = Some(mileage);
        }
        if let Some(year) = self.year {
            item.year = year;
        }

        *item != before
    }
}

/// 조회 응답
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuctionDto {
    pub id: Uuid,
    pub reserve_price: i64,
    pub seller: String,
    pub winner: Option<String>,
    pub sold_amount: Option<i64>,
    pub current_high_bid: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub auction_end: DateTime<Utc>,
    pub status: AuctionStatus,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub mileage: Option<i32>,
    pub image_url: Option<String>,
}

impl From<&AuctionRecord> for AuctionDto {
    fn from(record: &AuctionRecord) -> Self {
        Self {
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
}

// 최초의 양산 자동차(1886) ~ 내년 연식
fn check_year(year: i32, now: DateTime<Utc>) -> Option<String> {
    let max_year = now.year() + 1;
    if (1886..=max_year).contains(&year) {
        None
    } else {
        Some(format!("year는 1886 ~ {} 사이여야 합니다", max_year))
    }
}

// endregion: --- DTOs

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn mustang() -> Item {
        Item {
            make: "Ford".to_string(),
            model: "Mustang".to_string(),
            year: 2020,
            color: Some("Red".to_string()),
            mileage: Some(15000),
            image_url: None,
        }
    }

    #[test]
    fn patch_overwrites_only_present_fields() {
        let mut item = mustang();
        let patch = UpdateAuctionDto {
            color: Some("Blue".to_string()),
            mileage: Some(20000),
            ..Default::default()
        };

        assert!(patch.apply_to(&mut item));
        assert_eq!(item.color.as_deref(), Some("Blue"));
        assert_eq!(item.mileage, Some(20000));
        assert_eq!(item.make, "Ford");
        assert_eq!(item.model, "Mustang");
        assert_eq!(item.year, 2020);
    }

    #[test]
    fn empty_or_identical_patch_reports_no_change() {
        let mut item = mustang();
        assert!(!UpdateAuctionDto::default().apply_to(&mut item));

        let same = UpdateAuctionDto {
            make: Some("Ford".to_string()),
            year: Some(2020),
            ..Default::default()
        };
        assert!(!same.apply_to(&mut item));
        assert_eq!(item, mustang());
    }

    #[test]
    fn create_requires_make_and_model() {
        let now = Utc::now();
        let dto = CreateAuctionDto {
            make: " ".to_string(),
            model: String::new(),
            year: 2020,
            ..Default::default()
        };

        let err = dto.validate(now).unwrap_err();
        assert!(err.contains("make"));
        assert!(err.contains("model"));
    }

    #[test]
    fn create_rejects_negative_values_and_past_end() {
        let now = Utc::now();
        let dto = CreateAuctionDto {
            make: "Ford".to_string(),
            model: "Mustang".to_string(),
            year: 2020,
            mileage: Some(-1),
            reserve_price: -5,
            auction_end: Some(now - Duration::hours(1)),
            ..Default::default()
        };

        let err = dto.validate(now).unwrap_err();
        assert!(err.contains("mileage"));
        assert!(err.contains("reserve_price"));
        assert!(err.contains("auction_end"));
    }

    #[test]
    fn patch_validation_ignores_absent_fields() {
        let now = Utc::now();
        assert!(UpdateAuctionDto::default().validate(now).is_ok());

        let bad = UpdateAuctionDto {
            year: Some(1700),
            ..Default::default()
        };
        assert!(bad.validate(now).is_err());
    }

    #[test]
    fn into_record_defaults_end_and_status() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let dto = CreateAuctionDto {
            make: "Ford".to_string(),
            model: "Mustang".to_string(),
            year: 2020,
            ..Default::default()
        };

        let record = dto.into_record(Uuid::new_v4(), "alice", now, Duration::days(7));
        assert_eq!(record.seller, "alice");
        assert_eq!(record.status, AuctionStatus::Live);
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.auction_end, now + Duration::days(7));
    }

    #[test]
    fn timestamp_always_moves_forward() {
        let prev = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let same = advance_timestamp(Some(prev), prev);
        assert_eq!(same, prev + Duration::microseconds(1));

        let earlier = advance_timestamp(Some(prev), prev - Duration::seconds(3));
        assert!(earlier > prev);

        let later = prev + Duration::seconds(3);
        assert_eq!(advance_timestamp(Some(prev), later), later);
    }

    #[test]
    fn timestamp_is_truncated_to_microseconds() {
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let ts = advance_timestamp(None, now);
        assert_eq!(ts.timestamp_subsec_nanos(), 123_456_000);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            AuctionStatus::Live,
            AuctionStatus::Finished,
            AuctionStatus::ReserveNotMet,
        ] {
            assert_eq!(AuctionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AuctionStatus::parse("Open"), None);
    }
}
