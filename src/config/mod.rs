// region:    --- Imports
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

// endregion: --- Imports

// region:    --- Config Error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("환경 변수 누락: {0}")]
    Missing(&'static str),

    #[error("환경 변수 형식 오류: {key}={value}")]
    Invalid { key: &'static str, value: String },
}

// endregion: --- Config Error

// region:    --- App Config
const KAFKA_DELIVERY_MARGIN: Duration = Duration::from_millis(100);

/// 데이터베이스 설정
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Kafka 설정
#[derive(Debug, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    pub partitions: i32,
    pub replication: i32,
    pub message_timeout: Duration,
}

/// 서비스 전체 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database: DatabaseConfig,
    pub kafka: KafkaConfig,
    pub store_timeout: Duration,
    pub publish_timeout: Duration,
    /// 인증이 없으므로 판매자는 설정값으로 고정
    pub default_seller: String,
    pub auction_default_days: i64,
}

impl AppConfig {
    /// .env 및 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            info!("{:<12} --> .env 파일 로드", "Config");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 구성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let publish_ms: u64 = parse_or(&lookup, "PUBLISH_TIMEOUT_MS", 5000)?;
        if publish_ms < 2 {
            return Err(ConfigError::Invalid {
                key: "PUBLISH_TIMEOUT_MS",
                value: publish_ms.to_string(),
            });
        }
        let publish_timeout = Duration::from_millis(publish_ms);

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            },
            kafka: KafkaConfig {
                brokers: lookup("KAFKA_BROKERS").unwrap_or_else(|| "localhost:9092".to_string()),
                topic: lookup("AUCTION_TOPIC").unwrap_or_else(|| "auctions".to_string()),
                partitions: parse_or(&lookup, "TOPIC_PARTITIONS", 5)?,
                replication: parse_or(&lookup, "TOPIC_REPLICATION", 1)?,
                message_timeout: kafka_delivery_timeout(publish_timeout),
            },
            store_timeout: Duration::from_millis(parse_or(&lookup, "STORE_TIMEOUT_MS", 5000)?),
            publish_timeout,
            default_seller: lookup("DEFAULT_SELLER").unwrap_or_else(|| "test".to_string()),
            auction_default_days: parse_or(&lookup, "AUCTION_DEFAULT_DAYS", 7)?,
        })
    }
}

/// 브로커 전송 제한 시간 (서비스 발행 제한 시간보다 항상 짧음)
fn kafka_delivery_timeout(publish_timeout: Duration) -> Duration {
    if publish_timeout > KAFKA_DELIVERY_MARGIN * 2 {
        publish_timeout - KAFKA_DELIVERY_MARGIN
    } else {
        (publish_timeout / 2).max(Duration::from_millis(1))
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

// endregion: --- App Config
