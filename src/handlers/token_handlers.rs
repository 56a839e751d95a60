use actix_web::{web, HttpRequest, HttpResponse, Result, post};
use chrono::Utc;
use validator::Validate;
use crate::domain::{ApiResponse, LogoutRequest, LogoutResponse, RefreshRequest, VerifyResponse};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::utils::token_utils::extract_bearer_token;

/// 토큰 교체 API 핸들러
///
/// 리프레시 토큰을 새 액세스/리프레시 토큰 쌍으로 교체합니다.
/// 제시된 리프레시 토큰은 폐기됩니다.
#[post("/refresh")]
pub async fn refresh_token_handler(
    state: web::Data<AppState>,
    refresh_req: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    refresh_req
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let pair = state.issuer.rotate(&refresh_req.refresh_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(pair.to_token_pair(Utc::now()))))
}

/// 로그아웃 API 핸들러
///
/// Authorization 헤더의 액세스 토큰과 (선택적으로) 본문의 리프레시 토큰을
/// 하나의 트랜잭션으로 폐기합니다. 본문은 생략할 수 있지만,
/// 본문이 있는데 해석할 수 없으면 아무것도 폐기하지 않고 400을 반환합니다.
#[post("/logout")]
pub async fn logout_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let auth_header = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let access_token = extract_bearer_token(auth_header)?;

    let logout_req = LogoutRequest::from_body(&body)?;

    let revoked = state
        .logout
        .logout(access_token, logout_req.refresh_token.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        LogoutResponse { revoked },
        "로그아웃이 성공적으로 처리되었습니다",
    )))
}

/// 토큰 검증 API 핸들러
///
/// `AuthMiddleware::required()` 뒤에서만 등록됩니다.
pub async fn verify_handler(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(VerifyResponse {
        user_id: user.user_id,
        role: user.role.as_str().to_string(),
        jti: user.jti,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use actix_web::{test, App};
    use actix_web::http::StatusCode;
    use jsonwebtoken::Algorithm;
    use serde_json::Value;
    use crate::config::JwtConfig;
    use crate::domain::entities::users::user::{User, UserRole};
    use crate::repositories::tokens::{MemoryTokenStore, TokenStore};
    use crate::repositories::users::InMemoryUserRepository;
    use crate::routes::configure_all_routes;

    fn state_with_user() -> (AppState, String) {
        let config = Arc::new(JwtConfig::hmac("secret", Algorithm::HS256).unwrap());
        let users = Arc::new(InMemoryUserRepository::new());
        let subject = users
            .insert(User::new("searcher@example.com".to_string(), UserRole::Searcher))
            .unwrap();
        (AppState::new(config, Arc::new(MemoryTokenStore::new()), users), subject)
    }

    #[actix_web::test]
    async fn test_logout_without_body() {
        let (state, subject) = state_with_user();
        let pair = state.issuer.issue_pair(&subject, UserRole::Searcher).await.unwrap();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(("Authorization", format!("Bearer {}", pair.access.raw)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["revoked"], 1);
    }

    #[actix_web::test]
    async fn test_second_logout_is_conflict() {
        let (state, subject) = state_with_user();
        let pair = state.issuer.issue_pair(&subject, UserRole::Searcher).await.unwrap();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure_all_routes),
        )
        .await;

        let logout = || {
            test::TestRequest::post()
                .uri("/api/v1/auth/logout")
                .insert_header(("Authorization", format!("Bearer {}", pair.access.raw)))
                .set_json(serde_json::json!({ "refresh_token": pair.refresh.raw }))
                .to_request()
        };

        assert_eq!(test::call_service(&app, logout()).await.status(), StatusCode::OK);

        let resp = test::call_service(&app, logout()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "already_logged_out");
    }

    #[actix_web::test]
    async fn test_logout_with_unreadable_body_revokes_nothing() {
        let (state, subject) = state_with_user();
        let pair = state.issuer.issue_pair(&subject, UserRole::Searcher).await.unwrap();
        let store = state.store.clone();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure_all_routes),
        )
        .await;

        let wrong_content_type = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(("Authorization", format!("Bearer {}", pair.access.raw)))
            .insert_header(("Content-Type", "text/plain"))
            .set_payload(format!("refresh_token={}", pair.refresh.raw))
            .to_request();
        let wrong_type = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(("Authorization", format!("Bearer {}", pair.access.raw)))
            .set_json(serde_json::json!({ "refresh_token": 42 }))
            .to_request();

        for req in [wrong_content_type, wrong_type] {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], "invalid_request_data");
        }

        assert!(!store.exists_in_blacklist(&pair.access.jti).await.unwrap());
        assert!(!store.exists_in_blacklist(&pair.refresh.jti).await.unwrap());
    }

    #[actix_web::test]
    async fn test_logout_reads_json_body_regardless_of_content_type() {
        let (state, subject) = state_with_user();
        let pair = state.issuer.issue_pair(&subject, UserRole::Searcher).await.unwrap();
        let store = state.store.clone();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(("Authorization", format!("Bearer {}", pair.access.raw)))
            .insert_header(("Content-Type", "text/plain"))
            .set_payload(serde_json::json!({ "refresh_token": pair.refresh.raw }).to_string())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["revoked"], 2);
        assert!(store.exists_in_blacklist(&pair.refresh.jti).await.unwrap());
    }

    #[actix_web::test]
    async fn test_logout_requires_authorization_header() {
        let (state, _) = state_with_user();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/v1/auth/logout").to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_refresh_returns_new_pair() {
        let (state, subject) = state_with_user();
        let pair = state.issuer.issue_pair(&subject, UserRole::Searcher).await.unwrap();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(serde_json::json!({ "refresh_token": pair.refresh.raw }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_ne!(body["data"]["refresh_token"], pair.refresh.raw.as_str());
        assert!(body["data"]["expires_in"].as_i64().unwrap() > 0);
    }

    #[actix_web::test]
    async fn test_refresh_rejects_empty_token() {
        let (state, _) = state_with_user();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(serde_json::json!({ "refresh_token": "" }))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_verify_reports_subject_and_rejects_after_logout() {
        let (state, subject) = state_with_user();
        let pair = state.issuer.issue_pair(&subject, UserRole::Searcher).await.unwrap();
        let logout = state.logout.clone();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).configure(configure_all_routes),
        )
        .await;

        let verify = || {
            test::TestRequest::get()
                .uri("/api/v1/auth/verify")
                .insert_header(("Authorization", format!("Bearer {}", pair.access.raw)))
                .to_request()
        };

        let body: Value = test::call_and_read_body_json(&app, verify()).await;
        assert_eq!(body["data"]["user_id"], subject.as_str());
        assert_eq!(body["data"]["role"], "searcher");

        logout.logout(&pair.access.raw, None).await.unwrap();

        let resp = test::call_service(&app, verify()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "token_revoked");
    }
}
