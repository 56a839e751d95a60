//! 부동산 플랫폼 인증 토큰 백엔드
//!
//! JWT 액세스/리프레시 토큰의 발급, 검증, 교체, 폐기를 담당합니다.
//! 폐기는 블랙리스트로, 최신 발급 여부는 체크리스트로 추적합니다.
//!
//! # Features
//!
//! - **토큰 발급**: 액세스/리프레시 토큰 쌍을 하나의 트랜잭션으로 저장
//! - **토큰 검증**: 서명, 만료, 블랙리스트, 체크리스트 순서로 검증
//! - **로그아웃**: 마지막 발급 토큰인지 확인 후 원자적으로 블랙리스트 등록
//! - **리프레시 토큰 교체**: 이전 리프레시 토큰 폐기 + 새 쌍 발급
//! - **Redis**: 공유 토큰 저장소 (Lua 스크립트 기반 원자적 배치)
//! - **MongoDB**: 토큰 주체(사용자) 조회
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트, AuthMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← TokenIssuer, TokenValidator, LogoutService
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← TokenStore, UserLookup
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Redis + MongoDB │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use inmobiliaria_auth_backend::state::AppState;
//!
//! let state = AppState::new(config, store, users);
//! let pair = state.issuer.issue_pair(&user_id, UserRole::Searcher).await?;
//! let claims = state.validator.validate(&pair.access.raw).await?;
//! state.logout.logout(&pair.access.raw, Some(&pair.refresh.raw)).await?;
//! ```

pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
