//! 인증 토큰 수명주기 서비스 모듈
//!
//! 발급, 검증, 교체, 폐기를 담당하는 서비스들을 제공합니다.
//!
//! # Features
//!
//! - [`TokenCodec`] - JWT 서명/검증 (HMAC, RSA)
//! - [`TokenIssuer`] - 토큰 쌍 발급, 리프레시 토큰 교체
//! - [`TokenValidator`] - 요청별 토큰 검증 (서명, 블랙리스트, 체크리스트)
//! - [`LogoutService`] - 마지막 발급 토큰 확인 후 원자적 폐기
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{LogoutService, TokenIssuer, TokenValidator};
//!
//! let pair = issuer.issue_pair(&user_id, UserRole::Searcher).await?;
//! let claims = validator.validate(&pair.access.raw).await?;
//! logout.logout(&pair.access.raw, Some(&pair.refresh.raw)).await?;
//! ```

pub mod token_codec;
pub mod token_issuer;
pub mod token_validator;
pub mod logout_service;

pub use token_codec::*;
pub use token_issuer::*;
pub use token_validator::*;
pub use logout_service::*;
