use serde::Deserialize;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// 토큰 갱신 요청 DTO
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refresh_token은 비어 있을 수 없습니다"))]
    pub refresh_token: String,
}

/// 로그아웃 요청 DTO
///
/// 액세스 토큰은 Authorization 헤더에서 추출하고,
/// 리프레시 토큰은 본문으로 선택적으로 전달합니다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "refresh_token은 비어 있을 수 없습니다"))]
    pub refresh_token: Option<String>,
}

impl LogoutRequest {
    /// 요청 본문을 해석합니다.
    ///
    /// 빈 본문만 "리프레시 토큰 없음"으로 취급합니다.
    /// 내용이 있는 본문은 Content-Type과 무관하게 JSON으로 해석하며,
    /// 해석 또는 검증에 실패하면 `ValidationError`를 반환합니다.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let request: Self = serde_json::from_slice(body)
            .map_err(|e| AppError::ValidationError(format!("로그아웃 요청 본문 해석 실패: {}", e)))?;
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_request_rejects_empty_token() {
        let request = RefreshRequest { refresh_token: String::new() };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_logout_request_refresh_is_optional() {
        let request: LogoutRequest = serde_json::from_str("{}").unwrap();
        assert!(request.refresh_token.is_none());
        assert!(request.validate().is_ok());

        let request = LogoutRequest { refresh_token: Some(String::new()) };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_logout_body_empty_means_access_only() {
        assert!(LogoutRequest::from_body(b"").unwrap().refresh_token.is_none());
        assert!(LogoutRequest::from_body(b"  \n").unwrap().refresh_token.is_none());
    }

    #[test]
    fn test_logout_body_must_parse_when_present() {
        let request = LogoutRequest::from_body(br#"{"refresh_token":"abc"}"#).unwrap();
        assert_eq!(request.refresh_token.as_deref(), Some("abc"));

        let rejected: [&[u8]; 3] = [br#"{"refresh_token":42}"#, b"refresh_token=abc", br#"{"refresh_token":""}"#];
        for body in rejected {
            assert!(matches!(LogoutRequest::from_body(body), Err(AppError::ValidationError(_))));
        }
    }
}
