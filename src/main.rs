// region:    --- Imports
use auction_catalog_service::auction::service::AuctionLifecycleService;
use auction_catalog_service::config::AppConfig;
use auction_catalog_service::database::DatabaseManager;
use auction_catalog_service::handlers::{self, AppState};
use auction_catalog_service::message_broker::{KafkaEventPublisher, KafkaManager};
use auction_catalog_service::store::PostgresAuctionStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
            return Err(e.into());
        }
    };

    // DatabaseManager 생성 및 스키마 초기화
    let db_manager = Arc::new(DatabaseManager::new(&config.database).await?);
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // Kafka 매니저 생성 및 초기화
    let kafka_manager = KafkaManager::new(&config.kafka)?;
    if let Err(e) = kafka_manager.initialize().await {
        error!("{:<12} --> Kafka 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> Kafka 초기화 성공", "Main");

    // 토픽 생성 (엔티티 이름)
    kafka_manager
        .create_topic(
            &config.kafka.topic,
            config.kafka.partitions,
            config.kafka.replication,
        )
        .await?;

    // 생명주기 서비스 구성
    let store = Arc::new(PostgresAuctionStore::new(db_manager.get_pool()));
    let publisher = Arc::new(KafkaEventPublisher::new(
        kafka_manager.get_producer(),
        &config.kafka.topic,
    ));
    let service = AuctionLifecycleService::new(store, publisher)
        .with_timeouts(config.store_timeout, config.publish_timeout)
        .with_default_days(config.auction_default_days);

    let routes_all = handlers::router(AppState {
        service: Arc::new(service),
        seller: Arc::from(config.default_seller.as_str()),
    });

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
