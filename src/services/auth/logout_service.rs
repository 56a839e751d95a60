//! 로그아웃 (토큰 폐기) 서비스
//!
//! (주체, 토큰 타입)별 상태는 ACTIVE에서 REVOKED로만 전이하며
//! 전이는 로그아웃으로만 일어납니다.
//!
//! ```text
//! decode(만료 허용) ─▶ 주체 확인 ─▶ 마지막 발급 토큰 조회 ─▶ jti 비교 ─▶ 블랙리스트 (단일 트랜잭션)
//!   InvalidSignature     ResourceNotFound     NotFound          MismatchError   AlreadyBlacklisted
//!   InvalidToken                                                                DatabaseConnectionError
//! ```

use std::sync::Arc;

use crate::domain::models::token::{Token, TokenClaims, TokenType};
use crate::errors::{AppError, AppResult};
use crate::repositories::tokens::TokenStore;
use crate::repositories::users::UserLookup;
use crate::services::auth::token_codec::TokenCodec;
use crate::utils::token_utils::fingerprint;

/// 로그아웃 처리기
#[derive(Clone)]
pub struct LogoutService {
    codec: TokenCodec,
    store: Arc<dyn TokenStore>,
    users: Arc<dyn UserLookup>,
}

impl LogoutService {
    pub fn new(codec: TokenCodec, store: Arc<dyn TokenStore>, users: Arc<dyn UserLookup>) -> Self {
        Self { codec, store, users }
    }

    /// 제시된 토큰들을 폐기합니다.
    ///
    /// 액세스 토큰만, 또는 액세스/리프레시 토큰을 함께 받을 수 있습니다.
    /// 만료된 토큰도 서명이 유효하면 폐기할 수 있습니다.
    /// 에러가 반환되면 어떤 토큰도 블랙리스트에 등록되지 않습니다.
    ///
    /// 제시된 토큰 중 일부가 이미 폐기되어 있으면 나머지만 폐기합니다.
    /// 모두 이미 폐기된 경우에만 `AlreadyBlacklisted`를 반환합니다.
    ///
    /// 반환값은 이번 호출에서 새로 블랙리스트에 등록된 토큰 수입니다.
    pub async fn logout(&self, access_raw: &str, refresh_raw: Option<&str>) -> AppResult<usize> {
        let access = self.decode_as(access_raw, TokenType::Access)?;
        let refresh = refresh_raw
            .map(|raw| self.decode_as(raw, TokenType::Refresh))
            .transpose()?;

        if let Some(refresh) = &refresh {
            if refresh.sub != access.sub {
                log::warn!(
                    "로그아웃 거부: 다른 주체의 리프레시 토큰 access.sub={} refresh.sub={}",
                    access.sub,
                    refresh.sub
                );
                return Err(AppError::MismatchError(format!(
                    "refresh token {} does not belong to subject {}",
                    refresh.jti, access.sub
                )));
            }
        }

        if self.users.find_by_id(&access.sub).await?.is_none() {
            log::warn!("로그아웃 거부: 존재하지 않는 사용자 {}", access.sub);
            return Err(AppError::ResourceNotFound(format!("user {}", access.sub)));
        }

        let mut presented = vec![self.last_issued(&access).await?];
        if let Some(refresh) = &refresh {
            presented.push(self.last_issued(refresh).await?);
        }

        // 이미 폐기된 토큰은 건너뛰고 나머지만 폐기한다
        let mut revoking = Vec::with_capacity(presented.len());
        for token in presented {
            if !self.store.exists_in_blacklist(&token.jti).await? {
                revoking.push(token);
            }
        }
        if revoking.is_empty() {
            log::info!("이미 로그아웃된 토큰 subject={} jti={}", access.sub, access.jti);
            return Err(AppError::AlreadyBlacklisted(access.jti));
        }

        let mut txn = self.store.begin();
        for token in &revoking {
            txn.add_to_blacklist(token);
        }
        txn.commit().await.inspect_err(|e| match e {
            AppError::AlreadyBlacklisted(jti) => {
                log::info!("이미 로그아웃된 토큰 subject={} jti={}", access.sub, jti)
            }
            AppError::DatabaseConnectionError(_) => {
                log::error!("로그아웃 블랙리스트 저장 실패 subject={}: {}", access.sub, e)
            }
            _ => log::warn!("로그아웃 실패 subject={}: {}", access.sub, e),
        })?;

        log::info!(
            "로그아웃 완료 subject={} access=[{}] refresh={}",
            access.sub,
            fingerprint(access_raw),
            refresh_raw.map(fingerprint).unwrap_or_else(|| "-".to_string())
        );
        Ok(revoking.len())
    }

    fn decode_as(&self, raw: &str, token_type: TokenType) -> AppResult<TokenClaims> {
        let claims = self.codec.decode_allow_expired(raw)?;
        if claims.token_type != token_type {
            return Err(AppError::InvalidToken(format!("expected {} token", token_type)));
        }
        Ok(claims)
    }

    /// 제시된 토큰이 주체의 마지막 발급 토큰인지 확인하고 그 레코드를 반환합니다.
    async fn last_issued(&self, claims: &TokenClaims) -> AppResult<Token> {
        let last = self
            .store
            .get_last_tokens(&claims.sub, claims.token_type)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::NotFound(format!("no {} token issued for {}", claims.token_type, claims.sub))
            })?;

        if last.jti != claims.jti {
            log::warn!(
                "로그아웃 거부: 마지막 발급 {} 토큰이 아님 subject={} jti={}",
                claims.token_type,
                claims.sub,
                claims.jti
            );
            return Err(AppError::MismatchError(format!(
                "{} token {} is not the last issued",
                claims.token_type, claims.jti
            )));
        }

        Ok(last)
    }
}
