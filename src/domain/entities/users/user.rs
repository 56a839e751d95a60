//! User Entity Implementation
//!
//! 토큰 주체(subject)로 참조되는 사용자 엔티티입니다.
//! 사용자 문서는 외부 서비스가 관리하며, 이 크레이트는 ID로 조회만 합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 사용자 역할
///
/// JWT 클레임의 `role` 필드로 전달됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// 매물을 검색하는 일반 사용자
    Searcher,
    /// 매물을 등록하는 부동산 업체
    RealEstateEntity,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Searcher => "searcher",
            UserRole::RealEstateEntity => "real_estate_entity",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사용자 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (unique)
    pub email: String,
    /// 사용자 역할
    pub role: UserRole,
    /// 계정 활성화 여부
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// 생성 시간
    pub created_at: DateTime,
}

fn default_active() -> bool {
    true
}

impl User {
    /// 새 사용자 생성 (ID 미할당)
    pub fn new(email: String, role: UserRole) -> Self {
        Self {
            id: None,
            email,
            role,
            is_active: true,
            created_at: DateTime::now(),
        }
    }

    /// ID를 할당한 사용자 생성
    pub fn with_id(id: ObjectId, email: String, role: UserRole) -> Self {
        Self {
            id: Some(id),
            ..Self::new(email, role)
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}
