//! 캐싱 계층 모듈
//!
//! Redis 연결과 JSON 직렬화, Lua 스크립트 실행을 제공합니다.
//! 토큰 저장소의 Redis 구현이 이 클라이언트를 사용합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let redis = RedisClient::from_env().await?;
//! let exists = redis.exists("jwt:blacklist:3f2a...").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
