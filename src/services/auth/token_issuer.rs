//! 토큰 발급 서비스
//!
//! 액세스/리프레시 토큰 쌍을 발급하고 리프레시 토큰을 교체합니다.
//! 토큰 저장과 체크리스트 마커 등록은 하나의 저장소 트랜잭션으로 커밋되므로
//! 한쪽만 저장된 토큰 쌍은 남지 않습니다.
//!
//! 새 발급은 이전 토큰을 블랙리스트에 올리지 않고 체크리스트 마커만 교체합니다.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::users::user::UserRole;
use crate::domain::models::token::{IssuedPair, Token, TokenType};
use crate::errors::{AppError, AppResult};
use crate::repositories::tokens::{StoreTransaction, TokenStore};
use crate::repositories::users::UserLookup;
use crate::services::auth::token_codec::TokenCodec;
use crate::services::auth::token_validator::TokenValidator;
use crate::utils::token_utils::fingerprint;

/// 토큰 발급기
#[derive(Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    store: Arc<dyn TokenStore>,
    users: Arc<dyn UserLookup>,
    validator: TokenValidator,
}

impl TokenIssuer {
    pub fn new(codec: TokenCodec, store: Arc<dyn TokenStore>, users: Arc<dyn UserLookup>) -> Self {
        let validator = TokenValidator::new(codec.clone(), Arc::clone(&store));
        Self {
            codec,
            store,
            users,
            validator,
        }
    }

    /// 새 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::DatabaseConnectionError` - 저장 실패 (아무것도 저장되지 않음)
    pub async fn issue_pair(&self, subject: &str, role: UserRole) -> AppResult<IssuedPair> {
        let mut txn = self.store.begin();
        let pair = match self.stage_pair(&mut txn, subject, role) {
            Ok(pair) => pair,
            Err(e) => {
                txn.rollback();
                return Err(e);
            }
        };
        txn.commit().await.inspect_err(|e| {
            log::error!("토큰 발급 저장 실패 subject={}: {}", subject, e);
        })?;

        log::info!(
            "토큰 발급 subject={} access=[{}] refresh=[{}]",
            subject,
            fingerprint(&pair.access.raw),
            fingerprint(&pair.refresh.raw)
        );
        Ok(pair)
    }

    /// 리프레시 토큰을 새 토큰 쌍으로 교체합니다.
    ///
    /// 제시된 리프레시 토큰은 블랙리스트에 등록되고 새 쌍이 저장됩니다.
    /// 두 작업은 하나의 트랜잭션으로 커밋됩니다.
    ///
    /// # Errors
    ///
    /// * 검증 에러 (`Expired`, `InvalidSignature`, `InvalidToken`, `NotFound`, `Revoked`, `Superseded`)
    /// * `AppError::ResourceNotFound` - 주체(사용자)가 존재하지 않음
    /// * `AppError::AlreadyBlacklisted` - 동시 교체 요청에서 먼저 커밋된 요청이 있음
    /// * `AppError::DatabaseConnectionError` - 저장 실패 (아무것도 변경되지 않음)
    pub async fn rotate(&self, refresh_raw: &str) -> AppResult<IssuedPair> {
        let claims = self.validator.validate_as(refresh_raw, TokenType::Refresh).await?;

        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("user {}", claims.sub)))?;

        let presented = self.store.get_by_jti(&claims.jti).await?;

        let mut txn = self.store.begin();
        txn.add_to_blacklist(&presented);
        let pair = self.stage_pair(&mut txn, &claims.sub, user.role)?;
        txn.commit().await.inspect_err(|e| {
            log::warn!("리프레시 토큰 교체 실패 [{}]: {}", fingerprint(refresh_raw), e);
        })?;

        log::info!(
            "리프레시 토큰 교체 subject={} [{}] -> [{}]",
            claims.sub,
            fingerprint(refresh_raw),
            fingerprint(&pair.refresh.raw)
        );
        Ok(pair)
    }

    fn stage_pair(&self, txn: &mut StoreTransaction<'_>, subject: &str, role: UserRole) -> AppResult<IssuedPair> {
        let access = self.mint(subject, role, TokenType::Access)?;
        let refresh = self.mint(subject, role, TokenType::Refresh)?;

        for token in [&access, &refresh] {
            txn.save(token.clone());
            txn.add_to_checklist(token)?;
        }

        Ok(IssuedPair { access, refresh })
    }

    fn mint(&self, subject: &str, role: UserRole, token_type: TokenType) -> AppResult<Token> {
        let claims = self.codec.new_claims(subject, role, token_type, Utc::now());
        let raw = self.codec.encode(&claims)?;
        Ok(Token::from_claims(raw, &claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::domain::entities::users::user::User;
    use crate::repositories::tokens::{FailPoint, MemoryTokenStore};
    use crate::repositories::users::InMemoryUserRepository;
    use jsonwebtoken::Algorithm;

    struct Fixture {
        store: Arc<MemoryTokenStore>,
        users: Arc<InMemoryUserRepository>,
        issuer: TokenIssuer,
    }

    fn fixture() -> Fixture {
        let codec = TokenCodec::new(Arc::new(JwtConfig::hmac("secret", Algorithm::HS256).unwrap()));
        let store = Arc::new(MemoryTokenStore::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let issuer = TokenIssuer::new(codec, store.clone(), users.clone());
        Fixture { store, users, issuer }
    }

    #[actix_web::test]
    async fn test_issue_pair_persists_both_tokens() {
        let f = fixture();

        let pair = f.issuer.issue_pair("user-1", UserRole::Searcher).await.unwrap();

        assert_eq!(f.store.token_count(), 2);
        assert_eq!(pair.access.token_type, TokenType::Access);
        assert_eq!(pair.refresh.token_type, TokenType::Refresh);
        assert!(f.store.exists_in_checklist(&pair.access.jti).await.unwrap());
        assert!(f.store.exists_in_checklist(&pair.refresh.jti).await.unwrap());
    }

    #[actix_web::test]
    async fn test_issue_pair_is_all_or_nothing() {
        let f = fixture();
        f.store.fail_on(FailPoint::Save { after: 1 });

        let result = f.issuer.issue_pair("user-1", UserRole::Searcher).await;

        assert!(matches!(result, Err(AppError::DatabaseConnectionError(_))));
        f.store.heal();
        assert_eq!(f.store.token_count(), 0);
    }

    #[actix_web::test]
    async fn test_rotate_revokes_presented_refresh() {
        let f = fixture();
        let subject = f
            .users
            .insert(User::new("agency@example.com".to_string(), UserRole::RealEstateEntity))
            .unwrap();
        let first = f.issuer.issue_pair(&subject, UserRole::RealEstateEntity).await.unwrap();

        let second = f.issuer.rotate(&first.refresh.raw).await.unwrap();

        assert_ne!(first.refresh.jti, second.refresh.jti);
        assert!(f.store.exists_in_blacklist(&first.refresh.jti).await.unwrap());
        assert!(matches!(
            f.issuer.rotate(&first.refresh.raw).await,
            Err(AppError::Revoked(_))
        ));
    }

    #[actix_web::test]
    async fn test_rotate_rejects_access_token() {
        let f = fixture();
        let pair = f.issuer.issue_pair("user-1", UserRole::Searcher).await.unwrap();

        assert!(matches!(
            f.issuer.rotate(&pair.access.raw).await,
            Err(AppError::InvalidToken(_))
        ));
    }

    #[actix_web::test]
    async fn test_rotate_requires_existing_subject() {
        let f = fixture();
        let pair = f.issuer.issue_pair("ghost", UserRole::Searcher).await.unwrap();

        assert!(matches!(
            f.issuer.rotate(&pair.refresh.raw).await,
            Err(AppError::ResourceNotFound(_))
        ));
        assert!(!f.store.exists_in_blacklist(&pair.refresh.jti).await.unwrap());
    }
}
