//! # Domain Module
//!
//! JWT 수명주기 코어가 다루는 도메인 타입을 정의합니다.
//!
//! - [`entities`] - 사용자 엔티티 (외부 협력자, 참조 전용)
//! - [`models`] - 토큰 레코드, 클레임, 블랙리스트/체크리스트, 인증 컨텍스트
//! - [`dto`] - HTTP 요청/응답 객체

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use dto::*;
pub use models::*;
