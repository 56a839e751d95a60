//! JWT 토큰 저장소 모듈
//!
//! 토큰 레코드, 블랙리스트, 체크리스트의 저장과 조회를 담당합니다.
//!
//! # Features
//!
//! - **TokenStore trait**: 저장소 구현 교체와 테스트 더블 지원
//! - **StoreTransaction**: 여러 쓰기를 all-or-nothing으로 커밋
//! - **Redis 구현**: Lua 스크립트로 배치 원자성 보장
//! - **메모리 구현**: 개발/테스트용, 장애 주입 지원
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::repositories::tokens::{MemoryTokenStore, TokenStore};
//!
//! let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
//! let mut txn = store.begin();
//! txn.add_to_blacklist(&token);
//! txn.commit().await?;
//! ```

pub mod token_store;
pub mod memory_store;
pub mod redis_store;

pub use token_store::*;
pub use memory_store::*;
pub use redis_store::*;
