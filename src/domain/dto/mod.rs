//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 데이터를 전송하기 위한 객체들을 정의합니다.
//! 입력값 검증은 `validator` crate를 사용합니다.

pub mod tokens;

pub use tokens::*;
