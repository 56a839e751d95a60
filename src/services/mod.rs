//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 `Arc<dyn TokenStore>`, `Arc<dyn UserLookup>`을 생성 시 주입받으며
//! [`AppState`](crate::state::AppState)를 통해 핸들러와 미들웨어에 공유됩니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{TokenCodec, TokenIssuer};
//!
//! let codec = TokenCodec::new(Arc::new(JwtConfig::from_env()?));
//! let issuer = TokenIssuer::new(codec, store, users);
//! ```

pub mod auth;
