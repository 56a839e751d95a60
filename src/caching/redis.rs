//! # Redis 클라이언트 구현
//!
//! 토큰 저장소의 Redis 백엔드가 사용하는 얇은 클라이언트 래퍼입니다.
//! JSON 직렬화 조회, 리스트 조회, Lua 스크립트 실행을 제공합니다.
//!
//! ## 연결 관리
//!
//! 연결 시 한 번 만든 [`ConnectionManager`]를 모든 호출이 공유합니다.
//! 매니저는 하나의 멀티플렉싱 연결을 유지하며 끊어지면 자동으로 재연결합니다.
//! 복제본은 같은 연결을 가리키므로 호출마다 복제해 사용합니다.

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use serde::de::DeserializeOwned;
use std::env;

/// Redis 클라이언트 래퍼
///
/// ## 사용 예제
///
/// ```rust,ignore
/// use crate::caching::redis::RedisClient;
///
/// let redis = RedisClient::from_env().await?;
/// let token: Option<Token> = redis.get("jwt:token:3f2a...").await?;
/// ```
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
}

fn decode_json<T: DeserializeOwned>(json: &str) -> Result<T, redis::RedisError> {
    serde_json::from_str(json).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON 역직렬화 실패",
            e.to_string(),
        ))
    })
}

impl RedisClient {
    /// 환경 변수 `REDIS_URL`로 연결합니다.
    ///
    /// 설정되지 않은 경우 기본값 `redis://localhost:6379`를 사용합니다.
    pub async fn from_env() -> Result<Self, redis::RedisError> {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        Self::connect(&redis_url).await
    }

    /// 주어진 URL로 연결 매니저를 만들고 PING으로 서버 가용성을 확인합니다.
    pub async fn connect(redis_url: &str) -> Result<Self, redis::RedisError> {
        let client = Client::open(redis_url)?;
        let mut conn = ConnectionManager::new(client).await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { conn })
    }

    /// 지정된 키의 JSON 값을 역직렬화하여 반환합니다.
    ///
    /// - `Ok(Some(T))` - 키가 존재하고 역직렬화 성공
    /// - `Ok(None)` - 키가 존재하지 않음
    /// - `Err(RedisError)` - Redis 오류 또는 역직렬화 실패
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let value: Option<String> = self.conn.clone().get(key).await?;
        value.as_deref().map(decode_json::<T>).transpose()
    }

    /// 여러 키의 JSON 값을 한 번의 MGET으로 조회합니다. 결과 순서는 키 순서와 같습니다.
    pub async fn get_many<T: DeserializeOwned>(&self, keys: &[String]) -> Result<Vec<Option<T>>, redis::RedisError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut self.conn.clone())
            .await?;

        values
            .iter()
            .map(|value| value.as_deref().map(decode_json::<T>).transpose())
            .collect()
    }

    /// 문자열 값을 그대로 반환합니다.
    pub async fn get_string(&self, key: &str) -> Result<Option<String>, redis::RedisError> {
        self.conn.clone().get(key).await
    }

    /// 키 존재 여부
    pub async fn exists(&self, key: &str) -> Result<bool, redis::RedisError> {
        self.conn.clone().exists(key).await
    }

    /// 리스트 구간 조회 (LRANGE)
    pub async fn lrange(&self, key: &str, start: isize, stop: isize) -> Result<Vec<String>, redis::RedisError> {
        self.conn.clone().lrange(key, start, stop).await
    }

    /// Lua 스크립트를 원자적으로 실행합니다.
    ///
    /// 스크립트는 `EVALSHA`로 실행되며 캐시에 없으면 자동으로 `EVAL`로 재시도합니다.
    pub async fn eval_script(
        &self,
        script: &Script,
        keys: &[String],
        args: &[String],
    ) -> Result<Option<String>, redis::RedisError> {
        let mut invocation = script.prepare_invoke();
        for key in keys {
            invocation.key(key);
        }
        for arg in args {
            invocation.arg(arg);
        }
        invocation.invoke_async::<Option<String>>(&mut self.conn.clone()).await
    }
}
