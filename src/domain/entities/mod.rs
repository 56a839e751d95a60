//! # Domain Entities Module
//!
//! 토큰의 주체인 사용자 엔티티를 정의합니다.
//! 이 크레이트는 사용자를 생성하거나 삭제하지 않고 조회만 합니다.

pub mod users;
