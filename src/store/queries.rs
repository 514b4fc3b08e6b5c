/// 경매 전체 조회
pub const LIST_AUCTIONS: &str = r#"
    SELECT id, reserve_price, seller, winner, sold_amount, current_high_bid,
           created_at, updated_at, auction_end, status,
           make, model, year, color, mileage, image_url
    FROM auctions
    ORDER BY make ASC
"#;

/// 수정 시각 이후 경매 조회
pub const LIST_AUCTIONS_SINCE: &str = r#"
    SELECT id, reserve_price, seller, winner, sold_amount, current_high_bid,
           created_at, updated_at, auction_end, status,
           make, model, year, color, mileage, image_url
    FROM auctions
    WHERE updated_at > $1
    ORDER BY make ASC
"#;

/// 경매 조회
pub const GET_AUCTION: &str = r#"
    SELECT id, reserve_price, seller, winner, sold_amount, current_high_bid,
           created_at, updated_at, auction_end, status,
           make, model, year, color, mileage, image_url
    FROM auctions
    WHERE id = $1
"#;

/// 경매 조회 (행 잠금)
pub const GET_AUCTION_FOR_UPDATE: &str = r#"
    SELECT id, reserve_price, seller, winner, sold_amount, current_high_bid,
           created_at, updated_at, auction_end, status,
           make, model, year, color, mileage, image_url
    FROM auctions
    WHERE id = $1
    FOR UPDATE
"#;

/// 경매 추가
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (
        id, reserve_price, seller, winner, sold_amount, current_high_bid,
        created_at, updated_at, auction_end, status,
        make, model, year, color, mileage, image_url
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
"#;

/// 경매 수정 (id, created_at 제외 전체 컬럼)
pub const UPDATE_AUCTION: &str = r#"
    UPDATE auctions
    SET reserve_price = $2, seller = $3, winner = $4, sold_amount = $5,
        current_high_bid = $6, updated_at = $7, auction_end = $8, status = $9,
        make = $10, model = $11, year = $12, color = $13, mileage = $14, image_url = $15
    WHERE id = $1
"#;

/// 경매 삭제
pub const DELETE_AUCTION: &str = "DELETE FROM auctions WHERE id = $1";
