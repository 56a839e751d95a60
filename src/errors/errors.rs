//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! JWT 수명주기(발급, 검증, 폐기)에서 발생할 수 있는 모든 실패를
//! 하나의 닫힌 열거형으로 표현합니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! ## 에러 분류
//!
//! | AppError | HTTP Status | code |
//! |----------|-------------|------|
//! | `InvalidSignature` | 401 | `token_not_valid` |
//! | `Expired` | 401 | `token_expired` |
//! | `InvalidToken` | 401 | `token_not_valid` |
//! | `Revoked` | 401 | `token_revoked` |
//! | `Superseded` | 401 | `token_superseded` |
//! | `MismatchError` | 401 | `token_error` |
//! | `AuthenticationError` | 401 | `authentication_failed` |
//! | `NotFound` | 404 | `token_not_found` |
//! | `ResourceNotFound` | 404 | `resource_not_found` |
//! | `AlreadyBlacklisted` | 409 | `already_logged_out` |
//! | `ValidationError` | 400 | `invalid_request_data` |
//! | `DatabaseConnectionError` | 500 | `database_connection_error` |
//! | `ConfigurationError` / `InternalError` | 500 | `internal_error` |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::{AppError, AppResult};
//!
//! async fn find_token(store: &dyn TokenStore, jti: &str) -> AppResult<Token> {
//!     store.get_by_jti(jti).await
//! }
//! ```

use actix_web::http::StatusCode;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 토큰 코덱과 저장소의 에러는 변환 없이 그대로 호출자에게 전파됩니다.
/// HTTP 계층은 `ResponseError` 구현을 통해 상태 코드를 결정합니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// 서명 검증 실패 (401 Unauthorized)
    #[error("Invalid token signature")]
    InvalidSignature,

    /// 토큰 만료 (401 Unauthorized)
    #[error("Token has expired")]
    Expired,

    /// JWT 형식이 아니거나 클레임이 잘못된 토큰 (401 Unauthorized)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// 저장소에 없는 토큰 또는 마지막 발급 기록 없음 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 토큰의 주체(사용자)가 존재하지 않음 (404 Not Found)
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// 블랙리스트에 등록된 토큰 (401 Unauthorized)
    #[error("Token has been revoked: {0}")]
    Revoked(String),

    /// 새 토큰 발급으로 대체된 토큰 (401 Unauthorized)
    #[error("Token has been superseded: {0}")]
    Superseded(String),

    /// 제시된 토큰이 사용자의 마지막 발급 토큰과 다름 (401 Unauthorized)
    #[error("Token mismatch: {0}")]
    MismatchError(String),

    /// 이미 블랙리스트에 존재하는 토큰 (409 Conflict)
    #[error("Token already blacklisted: {0}")]
    AlreadyBlacklisted(String),

    /// 저장소 연결/쓰기 실패 (500 Internal Server Error, 재시도 가능)
    #[error("Database connection error: {0}")]
    DatabaseConnectionError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 인증 헤더 누락 등 인증 실패 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 설정값 오류 (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 클라이언트에게 전달되는 기계 판독용 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidSignature | AppError::InvalidToken(_) => "token_not_valid",
            AppError::Expired => "token_expired",
            AppError::NotFound(_) => "token_not_found",
            AppError::ResourceNotFound(_) => "resource_not_found",
            AppError::Revoked(_) => "token_revoked",
            AppError::Superseded(_) => "token_superseded",
            AppError::MismatchError(_) => "token_error",
            AppError::AlreadyBlacklisted(_) => "already_logged_out",
            AppError::DatabaseConnectionError(_) => "database_connection_error",
            AppError::ValidationError(_) => "invalid_request_data",
            AppError::AuthenticationError(_) => "authentication_failed",
            AppError::ConfigurationError(_) | AppError::InternalError(_) => "internal_error",
        }
    }

    /// 호출자(인프라 계층)가 재시도해도 되는 에러인지 여부
    ///
    /// 이 크레이트 내부에서는 재시도하지 않습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::DatabaseConnectionError(_))
    }

    /// 동시 중복 로그아웃에서 발생하는 무해한 결과인지 여부
    pub fn is_benign_logout_outcome(&self) -> bool {
        matches!(self, AppError::AlreadyBlacklisted(_))
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyBlacklisted(_) => StatusCode::CONFLICT,
            AppError::InvalidSignature
            | AppError::Expired
            | AppError::InvalidToken(_)
            | AppError::Revoked(_)
            | AppError::Superseded(_)
            | AppError::MismatchError(_)
            | AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::DatabaseConnectionError(_)
            | AppError::ConfigurationError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 5xx 에러는 내부 정보를 노출하지 않도록 상세 메시지를 감춥니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();
        let detail = if status.is_server_error() {
            log::error!("요청 처리 실패: {}", self);
            match self {
                AppError::DatabaseConnectionError(_) => {
                    "데이터베이스 연결에 실패했습니다. 잠시 후 다시 시도해주세요".to_string()
                }
                _ => "서버 내부 오류가 발생했습니다".to_string(),
            }
        } else {
            self.to_string()
        };

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "code": self.code(),
            "detail": detail,
        }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 저장소 계층 에러를 `DatabaseConnectionError`로 변환합니다.
    fn storage_context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn storage_context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::DatabaseConnectionError(format!("{}: {}", msg, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        for error in [
            AppError::InvalidSignature,
            AppError::Expired,
            AppError::Revoked("jti".to_string()),
            AppError::Superseded("jti".to_string()),
            AppError::MismatchError("jti".to_string()),
        ] {
            assert_eq!(error.error_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::ResourceNotFound("user 42".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.code(), "resource_not_found");
    }

    #[test]
    fn test_already_blacklisted_is_conflict_and_benign() {
        let error = AppError::AlreadyBlacklisted("jti".to_string());

        assert_eq!(error.error_response().status(), StatusCode::CONFLICT);
        assert!(error.is_benign_logout_outcome());
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_database_error_is_retryable() {
        let error = AppError::DatabaseConnectionError("connection reset".to_string());

        assert_eq!(error.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.is_retryable());
        assert!(!AppError::MismatchError("x".to_string()).is_retryable());
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }

    #[test]
    fn test_storage_context_trait() {
        let result: Result<(), &str> = Err("broken pipe");

        match result.storage_context("blacklist insert") {
            Err(AppError::DatabaseConnectionError(msg)) => assert!(msg.contains("broken pipe")),
            other => panic!("Expected DatabaseConnectionError, got {:?}", other),
        }
    }
}
