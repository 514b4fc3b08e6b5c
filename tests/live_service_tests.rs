//! 실행 중인 서비스 대상 시나리오 테스트 (PostgreSQL, Kafka, 서버 필요)
//!
//! cargo test --test live_service_tests -- --ignored
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("AUCTION_SERVICE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// 생성 → 수정 → 삭제 사이클 테스트
#[tokio::test]
#[ignore = "requires a running service"]
async fn test_auction_lifecycle() {
    let client = Client::new();

    // 경매 생성
    let response = client
        .post(format!("{}/auctions", base_url()))
        .json(&json!({ "make": "Ford", "model": "Mustang", "year": 2020 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("Location header");
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["seller"], "test");

    // 부분 수정
    let response = client
        .put(format!("{}{}", base_url(), location))
        .json(&json!({ "color": "Blue" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: Value = client
        .get(format!("{}{}", base_url(), location))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["color"], "Blue");
    assert_eq!(fetched["model"], "Mustang");

    // 삭제 후 조회
    let response = client
        .delete(format!("{}{}", base_url(), location))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}{}", base_url(), location))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// 없는 경매 수정은 404
#[tokio::test]
#[ignore = "requires a running service"]
async fn test_update_unknown_auction() {
    let response = Client::new()
        .put(format!(
            "{}/auctions/00000000-0000-0000-0000-000000000000",
            base_url()
        ))
        .json(&json!({ "color": "Red" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
