//! 데이터 액세스 계층
//!
//! - [`tokens`] - 토큰/블랙리스트/체크리스트 저장소 (Redis, 메모리)
//! - [`users`] - 토큰 주체 조회 (MongoDB, 메모리)

pub mod tokens;
pub mod users;
