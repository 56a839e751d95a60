//! # Authentication Configuration Module
//!
//! JWT 서명 키, 알고리즘, 토큰 수명, 체크리스트 검증 여부 등
//! 토큰 수명주기와 관련된 설정을 관리하는 모듈입니다.
//!
//! 설정은 프로세스 시작 시 [`JwtConfig::from_env`]로 한 번만 로드되며,
//! 이후에는 `Arc<JwtConfig>`로 공유되는 불변 값입니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### HMAC 서명 (기본)
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ALGORITHM="HS256"            # HS256 | HS384 | HS512
//! ```
//!
//! ### RSA 서명
//! ```bash
//! export JWT_ALGORITHM="RS256"            # RS256 | RS384 | RS512
//! export JWT_PRIVATE_KEY_PATH="./secrets/jwt_private_key.pem"
//! export JWT_PUBLIC_KEY_PATH="./secrets/jwt_public_key.pem"
//! ```
//!
//! ### 토큰 수명 및 정책
//! ```bash
//! export JWT_ACCESS_LIFETIME_MINUTES="15"
//! export JWT_REFRESH_LIFETIME_DAYS="7"
//! export JWT_ENFORCE_CHECKLIST="true"
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::JwtConfig;
//!
//! let config = Arc::new(JwtConfig::from_env()?);
//! let lifetime = config.lifetime_for(TokenType::Access);
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::config::Environment;
use crate::domain::models::token::TokenType;
use crate::errors::{AppError, AppResult};

/// 개발 환경에서만 허용되는 기본 비밀키
const DEV_FALLBACK_SECRET: &str = "inmobiliaria-dev-secret-change-me";

/// 기본 액세스 토큰 수명 (분)
pub const DEFAULT_ACCESS_LIFETIME_MINUTES: i64 = 15;

/// 기본 리프레시 토큰 수명 (일)
pub const DEFAULT_REFRESH_LIFETIME_DAYS: i64 = 7;

/// JSON Web Token (JWT) 관련 설정
///
/// 서명/검증 키와 알고리즘, 토큰 타입별 수명을 보관합니다.
///
/// ## 권장 설정값
///
/// - **개발**: 액세스 토큰 60분, 리프레시 토큰 7일
/// - **프로덕션**: 액세스 토큰 5~15분, 리프레시 토큰 1~7일
#[derive(Clone)]
pub struct JwtConfig {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
    enforce_checklist: bool,
}

impl JwtConfig {
    /// HMAC 계열(HS256/HS384/HS512) 설정을 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 비밀키가 비어 있거나 HMAC 알고리즘이 아닌 경우
    pub fn hmac(secret: &str, algorithm: Algorithm) -> AppResult<Self> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AppError::ConfigurationError(format!(
                "{:?}는 HMAC 알고리즘이 아닙니다",
                algorithm
            )));
        }
        if secret.is_empty() {
            return Err(AppError::ConfigurationError(
                "JWT 비밀키가 비어 있습니다".to_string(),
            ));
        }

        Ok(Self::with_keys(
            algorithm,
            EncodingKey::from_secret(secret.as_bytes()),
            DecodingKey::from_secret(secret.as_bytes()),
        ))
    }

    /// RSA 계열(RS256/RS384/RS512) 설정을 PEM 키 쌍으로 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - RSA 알고리즘이 아니거나 PEM 파싱 실패
    pub fn rsa_pem(private_pem: &[u8], public_pem: &[u8], algorithm: Algorithm) -> AppResult<Self> {
        if !matches!(algorithm, Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512) {
            return Err(AppError::ConfigurationError(format!(
                "{:?}는 RSA 알고리즘이 아닙니다",
                algorithm
            )));
        }

        let encoding_key = EncodingKey::from_rsa_pem(private_pem)
            .map_err(|e| AppError::ConfigurationError(format!("RSA 개인키 파싱 실패: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem)
            .map_err(|e| AppError::ConfigurationError(format!("RSA 공개키 파싱 실패: {}", e)))?;

        Ok(Self::with_keys(algorithm, encoding_key, decoding_key))
    }

    fn with_keys(algorithm: Algorithm, encoding_key: EncodingKey, decoding_key: DecodingKey) -> Self {
        Self {
            algorithm,
            encoding_key,
            decoding_key,
            access_lifetime: Duration::minutes(DEFAULT_ACCESS_LIFETIME_MINUTES),
            refresh_lifetime: Duration::days(DEFAULT_REFRESH_LIFETIME_DAYS),
            enforce_checklist: true,
        }
    }

    /// 토큰 수명을 지정합니다.
    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_lifetime = access;
        self.refresh_lifetime = refresh;
        self
    }

    /// 체크리스트(마지막 발급 토큰) 검증 여부를 지정합니다.
    pub fn with_checklist(mut self, enforce: bool) -> Self {
        self.enforce_checklist = enforce;
        self
    }

    /// 환경 변수에서 JWT 설정을 로드합니다.
    ///
    /// 프로덕션 환경에서 `JWT_SECRET`이 없으면 에러를 반환하고,
    /// 그 외 환경에서는 경고 로그와 함께 개발용 기본키를 사용합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 알고리즘/키/수명 설정이 잘못된 경우
    pub fn from_env() -> AppResult<Self> {
        let algorithm_name = env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let algorithm = Algorithm::from_str(&algorithm_name).map_err(|_| {
            AppError::ConfigurationError(format!("지원하지 않는 JWT_ALGORITHM: {}", algorithm_name))
        })?;

        let config = match algorithm {
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                let private_path = env::var("JWT_PRIVATE_KEY_PATH")
                    .unwrap_or_else(|_| "./secrets/jwt_private_key.pem".to_string());
                let public_path = env::var("JWT_PUBLIC_KEY_PATH")
                    .unwrap_or_else(|_| "./secrets/jwt_public_key.pem".to_string());

                let private_pem = fs::read(&private_path).map_err(|e| {
                    AppError::ConfigurationError(format!("{} 읽기 실패: {}", private_path, e))
                })?;
                let public_pem = fs::read(&public_path).map_err(|e| {
                    AppError::ConfigurationError(format!("{} 읽기 실패: {}", public_path, e))
                })?;

                Self::rsa_pem(&private_pem, &public_pem, algorithm)?
            }
            _ => {
                let secret = match env::var("JWT_SECRET") {
                    Ok(secret) => secret,
                    Err(_) if Environment::current() == Environment::Production => {
                        return Err(AppError::ConfigurationError(
                            "프로덕션 환경에서는 JWT_SECRET이 필수입니다".to_string(),
                        ));
                    }
                    Err(_) => {
                        log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                        DEV_FALLBACK_SECRET.to_string()
                    }
                };
                Self::hmac(&secret, algorithm)?
            }
        };

        let access_lifetime = lifetime_from_env(
            "JWT_ACCESS_LIFETIME_MINUTES",
            DEFAULT_ACCESS_LIFETIME_MINUTES,
            Duration::try_minutes,
        )?;
        let refresh_lifetime = lifetime_from_env(
            "JWT_REFRESH_LIFETIME_DAYS",
            DEFAULT_REFRESH_LIFETIME_DAYS,
            Duration::try_days,
        )?;
        let enforce_checklist = env::var("JWT_ENFORCE_CHECKLIST")
            .map(|value| parse_flag(&value))
            .unwrap_or(true);

        let config = config
            .with_lifetimes(access_lifetime, refresh_lifetime)
            .with_checklist(enforce_checklist);

        log::info!("JWT 설정 로드됨: {:?}", config);
        Ok(config)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn access_lifetime(&self) -> Duration {
        self.access_lifetime
    }

    pub fn refresh_lifetime(&self) -> Duration {
        self.refresh_lifetime
    }

    /// 검증 시 체크리스트(마지막 발급 토큰) 일치 여부까지 확인하는지
    pub fn enforce_checklist(&self) -> bool {
        self.enforce_checklist
    }

    /// 토큰 타입별 수명을 반환합니다.
    pub fn lifetime_for(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_lifetime,
            TokenType::Refresh => self.refresh_lifetime,
        }
    }
}

impl fmt::Debug for JwtConfig {
    // 키 material은 출력하지 않는다
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("access_lifetime_minutes", &self.access_lifetime.num_minutes())
            .field("refresh_lifetime_days", &self.refresh_lifetime.num_days())
            .field("enforce_checklist", &self.enforce_checklist)
            .finish()
    }
}

fn lifetime_from_env(name: &str, default: i64, unit: fn(i64) -> Option<Duration>) -> AppResult<Duration> {
    parse_lifetime(name, env::var(name).ok().as_deref(), default, unit)
}

/// 수명 값을 양의 정수로 해석하고 `unit`으로 기간을 만듭니다.
///
/// 값이 없으면 `default`를 사용합니다. 만료 시각 계산이 넘칠 만큼 큰 값은 거부됩니다.
fn parse_lifetime(
    name: &str,
    raw: Option<&str>,
    default: i64,
    unit: fn(i64) -> Option<Duration>,
) -> AppResult<Duration> {
    let value = match raw {
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(value) if value > 0 => value,
            _ => {
                return Err(AppError::ConfigurationError(format!(
                    "{}는 양의 정수여야 합니다: {}",
                    name, raw
                )));
            }
        },
        None => default,
    };

    unit(value)
        .filter(|lifetime| Utc::now().checked_add_signed(*lifetime).is_some())
        .ok_or_else(|| AppError::ConfigurationError(format!("{} 값이 너무 큽니다: {}", name, value)))
}

/// "true"/"1"/"yes"/"on" 을 참으로 해석합니다.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
