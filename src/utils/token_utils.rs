//! # 토큰 유틸리티
//!
//! 원본 토큰 문자열은 로그에 남기지 않습니다.
//! 대신 [`fingerprint`]로 만든 짧은 SHA-256 지문을 기록합니다.

use sha2::{Digest, Sha256};

use crate::errors::{AppError, AppResult};

/// 지문 길이 (hex 문자 수)
const FINGERPRINT_LEN: usize = 12;

/// 토큰의 SHA-256 지문 앞 12자리
///
/// # 예제
/// ```rust,ignore
/// log::warn!("폐기된 토큰 사용 시도: {}", fingerprint(raw));
/// ```
pub fn fingerprint(raw: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(raw.as_bytes()));
    digest[..FINGERPRINT_LEN].to_string()
}

/// `Authorization: Bearer {token}` 헤더에서 토큰 부분만 추출합니다.
///
/// 스킴은 대소문자를 구분하지 않으며 토큰이 비어 있으면 에러입니다.
pub fn extract_bearer_token(auth_header: &str) -> AppResult<&str> {
    let (scheme, token) = auth_header
        .trim()
        .split_once(' ')
        .ok_or_else(|| AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::AuthenticationError("Bearer 토큰이 필요합니다".to_string()));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::AuthenticationError("토큰이 비어 있습니다".to_string()));
    }
    Ok(token)
}
