//! # HTTP Request Handlers Module
//!
//! 토큰 수명주기 서비스를 HTTP로 노출하는 핸들러 함수들을 정의합니다.
//! 핸들러는 `web::Data<AppState>`에서 서비스를 꺼내 호출하고,
//! 에러는 `AppError`의 `ResponseError` 구현으로 응답됩니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 발급/검증/교체/폐기                   ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 토큰 저장소, 사용자 조회           ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 엔드포인트
//!
//! - `POST /api/v1/auth/logout` - 액세스(+리프레시) 토큰 폐기
//! - `POST /api/v1/auth/refresh` - 리프레시 토큰 교체
//! - `GET  /api/v1/auth/verify` - 액세스 토큰 검증 (AuthMiddleware)

pub mod token_handlers;
