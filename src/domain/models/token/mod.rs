//! JWT 토큰 도메인 모델

pub mod token;

pub use token::*;
