//! JWT 토큰 레코드, 클레임, 블랙리스트/체크리스트 엔트리
//!
//! RFC 7519 표준 클레임(`sub`, `jti`, `iat`, `exp`)과 애플리케이션 클레임
//! (`role`, `token_type`)을 담는 페이로드, 그리고 저장소에 영속되는
//! 토큰 레코드를 정의합니다.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::users::user::UserRole;

/// 토큰 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// API 접근용 단기 토큰
    Access,
    /// 토큰 갱신용 장기 토큰
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT 토큰의 클레임(Payload) 구조체
///
/// ## 클레임 구성
///
/// - `sub`: 토큰의 주체 (사용자 ID)
/// - `role`: 사용자 역할 (searcher, real_estate_entity)
/// - `jti`: 토큰 고유 식별자 (UUID v4, 하이픈 없는 hex)
/// - `token_type`: access / refresh
/// - `iat`: 토큰 발급 시간 (Unix timestamp)
/// - `exp`: 토큰 만료 시간 (Unix timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: UserRole,
    pub jti: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    /// 새 `jti`를 가진 클레임을 생성합니다.
    pub fn new(
        subject: &str,
        role: UserRole,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            role,
            jti: new_jti(),
            token_type,
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        from_timestamp(self.iat)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        from_timestamp(self.exp)
    }

    /// `now > exp` 이면 만료
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// 발급된 토큰 한 건의 저장소 레코드
///
/// 생성 후 변경되지 않습니다. 사용자가 삭제되어도 감사 목적으로
/// `subject`가 `None`인 채로 남을 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 토큰 고유 식별자 (저장소 전체에서 유일)
    pub jti: String,
    /// 서명된 JWT 문자열
    pub raw: String,
    pub expires_at: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
    /// 토큰 주체 (약한 참조)
    pub subject: Option<String>,
    pub token_type: TokenType,
}

impl Token {
    /// 서명된 문자열과 클레임으로부터 레코드를 생성합니다.
    pub fn from_claims(raw: String, claims: &TokenClaims) -> Self {
        Self {
            jti: claims.jti.clone(),
            raw,
            expires_at: claims.expires_at(),
            issued_at: claims.issued_at(),
            subject: Some(claims.sub.clone()),
            token_type: claims.token_type,
        }
    }

    /// 남은 수명 (초). 이미 만료된 경우 0
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}

/// 폐기된 토큰 기록
///
/// 토큰과 1:1 관계이며 추가만 가능합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    /// 폐기된 토큰의 jti
    pub jti: String,
    pub subject: Option<String>,
    pub token_type: TokenType,
    pub revoked_at: DateTime<Utc>,
}

impl BlacklistEntry {
    pub fn for_token(token: &Token, revoked_at: DateTime<Utc>) -> Self {
        Self {
            jti: token.jti.clone(),
            subject: token.subject.clone(),
            token_type: token.token_type,
            revoked_at,
        }
    }
}

/// (주체, 토큰 타입)별 현재 유효한 마지막 발급 토큰 표시
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub subject: String,
    pub token_type: TokenType,
    pub jti: String,
    pub recorded_at: DateTime<Utc>,
}

impl ChecklistEntry {
    /// 주체가 없는 토큰은 체크리스트에 올릴 수 없으므로 `None`
    pub fn for_token(token: &Token, recorded_at: DateTime<Utc>) -> Option<Self> {
        token.subject.as_ref().map(|subject| Self {
            subject: subject.clone(),
            token_type: token.token_type,
            jti: token.jti.clone(),
            recorded_at,
        })
    }
}

/// 발급된 액세스/리프레시 토큰 레코드 쌍
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedPair {
    pub access: Token,
    pub refresh: Token,
}

impl IssuedPair {
    /// 클라이언트 전송용 문자열 쌍으로 변환합니다.
    pub fn to_token_pair(&self, now: DateTime<Utc>) -> TokenPair {
        TokenPair {
            access_token: self.access.raw.clone(),
            refresh_token: self.refresh.raw.clone(),
            expires_in: self.access.remaining_seconds(now),
        }
    }
}

/// JWT 토큰 쌍 응답 구조체
///
/// OAuth 2.0 표준의 토큰 응답 형식을 따릅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// 액세스 토큰 (API 접근용 단기 토큰)
    pub access_token: String,
    /// 리프레시 토큰 (토큰 갱신용 장기 토큰)
    pub refresh_token: String,
    /// 액세스 토큰 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

/// 128비트 난수 기반 jti (UUID v4 의 simple 표기)
pub fn new_jti() -> String {
    Uuid::new_v4().simple().to_string()
}

fn from_timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(token_type: TokenType) -> TokenClaims {
        let issued_at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        TokenClaims::new("user-1", UserRole::Searcher, token_type, issued_at, Duration::minutes(15))
    }

    #[test]
    fn test_claims_expiry_is_relative_to_issue_time() {
        let claims = claims(TokenType::Access);

        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.is_expired_at(claims.issued_at()));
        assert!(!claims.is_expired_at(claims.expires_at()));
        assert!(claims.is_expired_at(claims.expires_at() + Duration::seconds(1)));
    }

    #[test]
    fn test_jti_is_unique_hex() {
        let first = new_jti();
        let second = new_jti();

        assert_ne!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_from_claims_copies_identity() {
        let claims = claims(TokenType::Refresh);
        let token = Token::from_claims("a.b.c".to_string(), &claims);

        assert_eq!(token.jti, claims.jti);
        assert_eq!(token.subject.as_deref(), Some("user-1"));
        assert_eq!(token.token_type, TokenType::Refresh);
        assert_eq!(token.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_checklist_entry_requires_subject() {
        let claims = claims(TokenType::Access);
        let mut token = Token::from_claims("a.b.c".to_string(), &claims);
        assert!(ChecklistEntry::for_token(&token, Utc::now()).is_some());

        token.subject = None;
        assert!(ChecklistEntry::for_token(&token, Utc::now()).is_none());
    }

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(serde_json::to_string(&TokenType::Access).unwrap(), "\"access\"");
        assert_eq!(
            serde_json::from_str::<TokenType>("\"refresh\"").unwrap(),
            TokenType::Refresh
        );
    }
}
