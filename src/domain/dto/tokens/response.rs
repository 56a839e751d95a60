use serde::Serialize;

/// API 응답 래퍼
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// 로그아웃 결과
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// 블랙리스트에 등록된 토큰 수
    pub revoked: usize,
}

/// 토큰 검증 결과
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user_id: String,
    pub role: String,
    pub jti: String,
}
