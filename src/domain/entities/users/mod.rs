//! Users Entity Module
//!
//! 토큰 주체(subject)로 참조되는 사용자 엔티티와 역할을 정의합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::domain::entities::users::{User, UserRole};
//!
//! let user = User::new("searcher@example.com".to_string(), UserRole::Searcher);
//! let subject = user.id_string();
//! ```

pub mod user;

pub use user::*;
