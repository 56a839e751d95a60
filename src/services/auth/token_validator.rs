//! 토큰 검증 서비스
//!
//! 요청마다 실행되는 읽기 전용 검증입니다. 순서는 다음과 같습니다.
//!
//! 1. 디코딩 (서명/만료/형식) - 저장소 접근 전
//! 2. 저장소 조회 - `NotFound`
//! 3. 블랙리스트 확인 - `Revoked`
//! 4. 체크리스트 확인 (설정 시) - `Superseded`

use std::sync::Arc;

use crate::domain::models::token::{TokenClaims, TokenType};
use crate::errors::{AppError, AppResult};
use crate::repositories::tokens::TokenStore;
use crate::services::auth::token_codec::TokenCodec;
use crate::utils::token_utils::fingerprint;

/// 토큰 검증기
#[derive(Clone)]
pub struct TokenValidator {
    codec: TokenCodec,
    store: Arc<dyn TokenStore>,
}

impl TokenValidator {
    pub fn new(codec: TokenCodec, store: Arc<dyn TokenStore>) -> Self {
        Self { codec, store }
    }

    /// 토큰을 검증하고 클레임을 반환합니다. 상태를 변경하지 않습니다.
    pub async fn validate(&self, raw: &str) -> AppResult<TokenClaims> {
        let claims = self.codec.decode(raw).inspect_err(|e| {
            log::warn!("토큰 디코딩 실패 [{}]: {}", fingerprint(raw), e);
        })?;

        self.check_state(raw, claims).await
    }

    /// 지정된 타입의 토큰만 허용합니다.
    ///
    /// 타입 확인은 디코딩 직후, 저장소 접근 전에 이루어집니다.
    pub async fn validate_as(&self, raw: &str, token_type: TokenType) -> AppResult<TokenClaims> {
        let claims = self.codec.decode(raw).inspect_err(|e| {
            log::warn!("토큰 디코딩 실패 [{}]: {}", fingerprint(raw), e);
        })?;

        if claims.token_type != token_type {
            log::warn!(
                "토큰 타입 불일치 [{}]: expected={}, actual={}",
                fingerprint(raw),
                token_type,
                claims.token_type
            );
            return Err(AppError::InvalidToken(format!("expected {} token", token_type)));
        }

        self.check_state(raw, claims).await
    }

    async fn check_state(&self, raw: &str, claims: TokenClaims) -> AppResult<TokenClaims> {
        self.store.get_by_jti(&claims.jti).await.inspect_err(|e| {
            if let AppError::NotFound(_) = e {
                log::warn!("저장소에 없는 토큰 [{}]", fingerprint(raw));
            }
        })?;

        if self.store.exists_in_blacklist(&claims.jti).await? {
            log::warn!("폐기된 토큰 사용 시도 [{}] subject={}", fingerprint(raw), claims.sub);
            return Err(AppError::Revoked(claims.jti));
        }

        if self.codec.config().enforce_checklist()
            && !self.store.exists_in_checklist(&claims.jti).await?
        {
            log::warn!("대체된 토큰 사용 시도 [{}] subject={}", fingerprint(raw), claims.sub);
            return Err(AppError::Superseded(claims.jti));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::domain::entities::users::user::UserRole;
    use crate::repositories::tokens::{FailPoint, MemoryTokenStore};
    use crate::services::auth::token_issuer::TokenIssuer;
    use crate::repositories::users::InMemoryUserRepository;
    use jsonwebtoken::Algorithm;

    fn setup() -> (Arc<MemoryTokenStore>, TokenIssuer, TokenValidator) {
        let codec = TokenCodec::new(Arc::new(JwtConfig::hmac("secret", Algorithm::HS256).unwrap()));
        let store = Arc::new(MemoryTokenStore::new());
        let issuer = TokenIssuer::new(codec.clone(), store.clone(), Arc::new(InMemoryUserRepository::new()));
        (store.clone(), issuer, TokenValidator::new(codec, store))
    }

    #[actix_web::test]
    async fn test_type_mismatch_is_rejected_before_store_access() {
        let (store, issuer, validator) = setup();
        let pair = issuer.issue_pair("user-1", UserRole::Searcher).await.unwrap();
        store.fail_on(FailPoint::Everything);

        assert!(matches!(
            validator.validate_as(&pair.refresh.raw, TokenType::Access).await,
            Err(AppError::InvalidToken(_))
        ));
        assert!(matches!(
            validator.validate_as(&pair.access.raw, TokenType::Access).await,
            Err(AppError::DatabaseConnectionError(_))
        ));
    }

    #[actix_web::test]
    async fn test_revoked_takes_precedence_over_superseded() {
        let (store, issuer, validator) = setup();
        let old = issuer.issue_pair("user-1", UserRole::Searcher).await.unwrap();
        issuer.issue_pair("user-1", UserRole::Searcher).await.unwrap();
        store.add_to_blacklist(&old.access).await.unwrap();

        assert!(matches!(validator.validate(&old.access.raw).await, Err(AppError::Revoked(_))));
        assert!(matches!(validator.validate(&old.refresh.raw).await, Err(AppError::Superseded(_))));
    }
}
