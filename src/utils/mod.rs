//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`token_utils`] - Bearer 헤더 파싱, 로그용 토큰 지문
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::token_utils::{extract_bearer_token, fingerprint};
//!
//! let raw = extract_bearer_token("Bearer eyJhbGciOi...")?;
//! log::info!("토큰 검증: {}", fingerprint(raw));
//! ```

pub mod token_utils;
