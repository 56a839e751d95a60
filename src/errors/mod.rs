//! 에러 처리 모듈
//!
//! [`errors::AppError`]와 `AppResult` 별칭을 재export합니다.

pub mod errors;

pub use errors::*;
