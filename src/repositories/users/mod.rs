//! 사용자 조회 계층
//!
//! [`UserLookup`](user_repo::UserLookup) trait과 MongoDB/메모리 구현을 제공합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::{MongoUserRepository, UserLookup};
//!
//! let users = MongoUserRepository::new(Arc::new(Database::from_env().await?));
//! let user = users.find_by_id("665f1c...").await?;
//! ```

pub mod user_repo;

pub use user_repo::*;
