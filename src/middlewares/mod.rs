//! 미들웨어 모듈
//!
//! ActixWeb 애플리케이션의 요청 처리 파이프라인에서 사용되는 미들웨어들을 제공합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 액세스 토큰 추출 및 검증 (서명, 만료, 블랙리스트, 체크리스트)
//! - 사용자 정보를 request extension에 저장
//! - 선택적/강제 인증 모드, 역할 요구 지원
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use crate::middlewares::AuthMiddleware;
//!
//! App::new()
//!     .app_data(web::Data::new(state))
//!     .service(
//!         web::scope("/api/v1/listings")
//!             .wrap(AuthMiddleware::required_with_role(UserRole::RealEstateEntity))
//!             .route("", web::post().to(create_listing))
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

// 미들웨어 재export
pub use auth_middleware::{AuthMiddleware};
