// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::config::KafkaConfig;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::KafkaError;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Modules
mod memory;

pub use memory::InMemoryEventPublisher;

// endregion: --- Modules

// region:    --- Event Publisher
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Kafka 전송 오류: {0}")]
    Kafka(#[from] KafkaError),

    #[error("이벤트 직렬화 오류: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("이벤트 발행 시간 초과 ({0:?})")]
    Timeout(Duration),

    #[error("메시지 버스 사용 불가: {0}")]
    Unavailable(String),
}

/// 도메인 이벤트 발행 트레이트
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// 버스가 적재를 확인(또는 실패)할 때까지 대기
    async fn publish(&self, event: &AuctionEvent) -> Result<(), PublishError>;
}

/// Kafka 이벤트 발행자 (토픽은 엔티티 이름)
pub struct KafkaEventPublisher {
    producer: Arc<KafkaProducer>,
    topic: String,
}

impl KafkaEventPublisher {
    pub fn new(producer: Arc<KafkaProducer>, topic: &str) -> Self {
        Self {
            producer,
            topic: topic.to_string(),
        }
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, event: &AuctionEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)?;
        self.producer
            .send_message(
                &self.topic,
                &event.auction_id().to_string(),
                &payload,
                event.event_type(),
            )
            .await
    }
}

// endregion: --- Event Publisher

// region:    --- Kafka Producer
#[derive(Clone)]
pub struct KafkaProducer {
    producer: Arc<FutureProducer>,
}

/// KafkaProducer 구현
impl KafkaProducer {
    pub fn new(brokers: &str, message_timeout: Duration) -> Result<Self, KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", message_timeout.as_millis().to_string())
            .create()?;

        Ok(KafkaProducer {
            producer: Arc::new(producer),
        })
    }

    /// 메시지 전송
    pub async fn send_message(
        &self,
        topic: &str,
        key: &str,
        value: &str,
        event_type: &str,
    ) -> Result<(), PublishError> {
        info!(
            "{:<12} --> Kafka 메시지 전송: topic={}, key={}, type={}",
            "Producer", topic, key, event_type
        );
        let headers = OwnedHeaders::new().insert(Header {
            key: "event_type",
            value: Some(event_type),
        });
        let record = FutureRecord::to(topic)
            .key(key)
            .payload(value)
            .headers(headers);

        self.producer
            .send(record, Duration::from_secs(0))
            .await
            .map_err(|(e, _)| {
                error!("{:<12} --> Kafka 메시지 전송 실패: {:?}", "Producer", e);
                PublishError::Kafka(e)
            })?;

        Ok(())
    }
}

// endregion: --- Kafka Producer

// region:    --- Kafka Manager
pub struct KafkaManager {
    producer: Arc<KafkaProducer>,
    brokers: String,
}

/// KafkaManager 구현
impl KafkaManager {
    pub fn new(config: &KafkaConfig) -> Result<Self, KafkaError> {
        let producer = Arc::new(KafkaProducer::new(&config.brokers, config.message_timeout)?);

        Ok(KafkaManager {
            producer,
            brokers: config.brokers.clone(),
        })
    }

    /// 프로듀서 반환
    pub fn get_producer(&self) -> Arc<KafkaProducer> {
        Arc::clone(&self.producer)
    }

    /// Kafka 초기화 (브로커 메타데이터 조회로 연결 확인)
    pub async fn initialize(&self) -> Result<(), String> {
        info!("{:<12} --> Kafka 초기화 시작", "Manager");

        let producer = Arc::clone(&self.producer.producer);
        let broker_count = tokio::task::spawn_blocking(move || {
            producer
                .client()
                .fetch_metadata(None, Duration::from_secs(10))
                .map(|metadata| metadata.brokers().len())
        })
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| format!("Kafka 메타데이터 조회 실패: {:?}", e))?;

        info!(
            "{:<12} --> Kafka 연결 확인: brokers={}",
            "Manager", broker_count
        );
        Ok(())
    }

    /// 토픽 생성
    pub async fn create_topic(
        &self,
        topic_name: &str,
        num_partitions: i32,
        replication_factor: i32,
    ) -> Result<(), String> {
        info!("{:<12} --> Kafka 토픽 생성 시작: {}", "Manager", topic_name);

        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(|e| format!("AdminClient 생성 실패: {:?}", e))?;

        let new_topic = NewTopic::new(
            topic_name,
            num_partitions,
            TopicReplication::Fixed(replication_factor),
        );

        let results = admin_client
            .create_topics(&[new_topic], &AdminOptions::new())
            .await
            .map_err(|e| {
                error!("{:<12} --> Kafka 토픽 생성 실패: {:?}", "Manager", e);
                format!("토픽 생성 실패: {:?}", e)
            })?;

        for result in results {
            match result {
                Ok(name) => info!("{:<12} --> Kafka 토픽 생성 성공: {}", "Manager", name),
                Err((name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    warn!("{:<12} --> Kafka 토픽 이미 존재: {}", "Manager", name)
                }
                Err((name, code)) => {
                    error!(
                        "{:<12} --> Kafka 토픽 생성 실패: {} ({:?})",
                        "Manager", name, code
                    );
                    return Err(format!("토픽 생성 실패: {} ({:?})", name, code));
                }
            }
        }

        Ok(())
    }
}

// endregion: --- Kafka Manager
