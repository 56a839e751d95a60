//! JWT 인코딩/디코딩
//!
//! 서명 키와 알고리즘은 [`JwtConfig`]에서 가져옵니다.
//! 저장소에 접근하지 않는 순수 연산만 제공합니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};

use crate::config::JwtConfig;
use crate::domain::entities::users::user::UserRole;
use crate::domain::models::token::{TokenClaims, TokenType};
use crate::errors::{AppError, AppResult};

/// JWT 코덱
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: Arc<JwtConfig>,
}

impl TokenCodec {
    pub fn new(config: Arc<JwtConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// 설정된 수명으로 새 클레임을 생성합니다.
    pub fn new_claims(
        &self,
        subject: &str,
        role: UserRole,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
    ) -> TokenClaims {
        TokenClaims::new(subject, role, token_type, issued_at, self.config.lifetime_for(token_type))
    }

    /// 클레임에 서명하여 JWT 문자열을 생성합니다.
    pub fn encode(&self, claims: &TokenClaims) -> AppResult<String> {
        let header = Header::new(self.config.algorithm());

        encode(&header, claims, self.config.encoding_key())
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// 서명과 만료를 검증하고 클레임을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidSignature` - 서명 불일치
    /// * `AppError::Expired` - `now > exp`
    /// * `AppError::InvalidToken` - JWT 형식이 아니거나 클레임이 잘못됨
    pub fn decode(&self, raw: &str) -> AppResult<TokenClaims> {
        self.decode_with(raw, self.validation(true))
    }

    /// 서명만 검증하고 만료는 무시합니다. 로그아웃 시 사용합니다.
    pub fn decode_allow_expired(&self, raw: &str) -> AppResult<TokenClaims> {
        self.decode_with(raw, self.validation(false))
    }

    fn validation(&self, validate_exp: bool) -> Validation {
        let mut validation = Validation::new(self.config.algorithm());
        validation.leeway = 0;
        validation.validate_exp = validate_exp;
        validation
    }

    fn decode_with(&self, raw: &str, validation: Validation) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(raw, self.config.decoding_key(), &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Expired,
                ErrorKind::InvalidSignature => AppError::InvalidSignature,
                _ => AppError::InvalidToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(Arc::new(JwtConfig::hmac(secret, Algorithm::HS256).unwrap()))
    }

    #[test]
    fn test_encode_decode() {
        let codec = codec("secret");
        let claims = codec.new_claims("user-1", UserRole::Searcher, TokenType::Access, Utc::now());

        let raw = codec.encode(&claims).unwrap();

        assert_eq!(codec.decode(&raw).unwrap(), claims);
    }

    #[test]
    fn test_lifetimes_follow_token_type() {
        let codec = codec("secret");
        let now = Utc::now();

        let access = codec.new_claims("user-1", UserRole::Searcher, TokenType::Access, now);
        let refresh = codec.new_claims("user-1", UserRole::Searcher, TokenType::Refresh, now);

        assert_eq!(access.exp - access.iat, 15 * 60);
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let claims = codec("other").new_claims("user-1", UserRole::Searcher, TokenType::Access, Utc::now());
        let forged = codec("other").encode(&claims).unwrap();

        assert_eq!(codec("secret").decode(&forged), Err(AppError::InvalidSignature));
        assert_eq!(codec("secret").decode_allow_expired(&forged), Err(AppError::InvalidSignature));
    }

    #[test]
    fn test_expired_token() {
        let codec = codec("secret");
        let issued_at = Utc::now() - Duration::hours(2);
        let claims = codec.new_claims("user-1", UserRole::Searcher, TokenType::Access, issued_at);
        let raw = codec.encode(&claims).unwrap();

        assert_eq!(codec.decode(&raw), Err(AppError::Expired));
        assert_eq!(codec.decode_allow_expired(&raw).unwrap(), claims);
    }

    #[test]
    fn test_malformed_token() {
        assert!(matches!(codec("secret").decode("not-a-jwt"), Err(AppError::InvalidToken(_))));
    }
}
