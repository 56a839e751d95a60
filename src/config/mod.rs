//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, CORS, 속도 제한, 토큰 저장소 백엔드 설정
//! - [`auth_config`] - JWT 서명 키, 알고리즘, 토큰 수명 설정
//!
//! ## 설계 원칙
//!
//! - 민감한 정보는 환경 변수로만 제공
//! - 기본값은 개발 환경에서만 안전
//! - 프로덕션에서는 필수 설정값 누락 시 시작 실패
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! export CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
//! export RATE_LIMIT_PER_SECOND="100"
//! export RATE_LIMIT_BURST_SIZE="200"
//!
//! # JWT 설정
//! export JWT_SECRET="your-super-secret-key"
//! export JWT_ACCESS_LIFETIME_MINUTES="15"
//! export JWT_REFRESH_LIFETIME_DAYS="7"
//!
//! # 저장소
//! export TOKEN_STORE="redis"        # redis | memory
//! export REDIS_URL="redis://localhost:6379"
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="inmobiliaria"
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
