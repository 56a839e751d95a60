//! 인증 토큰 백엔드 서버
//!
//! 설정을 로드하고 토큰 저장소와 사용자 조회 협력자를 연결한 뒤
//! Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use inmobiliaria_auth_backend::caching::redis::RedisClient;
use inmobiliaria_auth_backend::config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig, StoreBackend};
use inmobiliaria_auth_backend::db::Database;
use inmobiliaria_auth_backend::repositories::tokens::{MemoryTokenStore, RedisTokenStore, TokenStore};
use inmobiliaria_auth_backend::repositories::users::{MongoUserRepository, UserLookup};
use inmobiliaria_auth_backend::routes::configure_all_routes;
use inmobiliaria_auth_backend::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));

    info!("🚀 인증 토큰 서비스 시작중...");

    let config = JwtConfig::from_env().map(Arc::new).map_err(|e| {
        error!("JWT 설정 로드 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    let (store, users) = initialize_data_stores().await?;
    let state = web::Data::new(AppState::new(config, store, users));

    info!("✅ 토큰 서비스 초기화 완료");

    start_http_server(state).await
}

/// `PROFILE`(기본값 dev)에 맞는 `.env.{profile}` 파일을 로드합니다.
///
/// 프로필 파일이 없으면 기본 `.env`를 시도합니다.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());
    let filename = format!(".env.{}", profile);

    // 로거 초기화 전이므로 결과는 stderr로 직접 출력
    if dotenv::from_filename(&filename).is_err() && dotenv::dotenv().is_err() {
        eprintln!("{} / .env 파일 없음, 프로세스 환경 변수만 사용", filename);
    }
}

/// 토큰 저장소(`TOKEN_STORE`)와 MongoDB 사용자 조회를 연결합니다.
async fn initialize_data_stores() -> io::Result<(Arc<dyn TokenStore>, Arc<dyn UserLookup>)> {
    let database = Database::from_env().await.map_err(|e| {
        error!("MongoDB 연결 실패: {}", e);
        io::Error::other(e)
    })?;
    let users: Arc<dyn UserLookup> = Arc::new(MongoUserRepository::new(Arc::new(database)));

    let store: Arc<dyn TokenStore> = match StoreBackend::current() {
        StoreBackend::Redis => {
            let redis = RedisClient::from_env().await.map_err(|e| {
                error!("Redis 연결 실패: {}", e);
                io::Error::other(e)
            })?;
            Arc::new(RedisTokenStore::new(redis))
        }
        StoreBackend::Memory => {
            warn!("⚠️ 메모리 토큰 저장소 사용 중 (단일 프로세스 전용)");
            Arc::new(MemoryTokenStore::new())
        }
    };

    Ok((store, users))
}

async fn start_http_server(state: web::Data<AppState>) -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();
    let cors_config = CorsConfig::from_env();
    let rate_limit = RateLimitConfig::from_env();

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other(format!("잘못된 Rate Limiting 설정: {:?}", rate_limit)))?;

    info!("🛡️ Rate Limiting: {:?}", rate_limit);
    info!("🌐 CORS 허용 Origin: {:?}", cors_config.allowed_origins);
    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&cors_config))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .run()
    .await
}

fn configure_cors(config: &CorsConfig) -> Cors {
    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}
