//! # Domain Models Module
//!
//! 토큰과 인증 컨텍스트를 표현하는 값 객체들을 정의합니다.
//!
//! ## Entities vs Models 구분
//!
//! - **Entities** (`../entities/`): 외부 저장소의 사용자 문서 (참조만 함)
//! - **Models** (`./`): 토큰 레코드, 클레임, 블랙리스트/체크리스트 엔트리, 인증된 사용자
//!
//! ```text
//! models/
//! ├── token/   ← TokenClaims, Token, BlacklistEntry, ChecklistEntry, TokenPair
//! └── auth/    ← AuthenticatedUser, AuthMode, RequiredRole
//! ```

pub mod auth;
pub mod token;
