use std::sync::Arc;

use crate::config::JwtConfig;
use crate::repositories::tokens::TokenStore;
use crate::repositories::users::UserLookup;
use crate::services::auth::{LogoutService, TokenCodec, TokenIssuer, TokenValidator};

/// 핸들러와 미들웨어가 공유하는 서비스 묶음
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TokenStore>,
    pub users: Arc<dyn UserLookup>,
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
    pub logout: LogoutService,
}

impl AppState {
    /// 설정과 저장소로부터 서비스들을 조립합니다.
    pub fn new(config: Arc<JwtConfig>, store: Arc<dyn TokenStore>, users: Arc<dyn UserLookup>) -> Self {
        let codec = TokenCodec::new(config);

        Self {
            issuer: TokenIssuer::new(codec.clone(), Arc::clone(&store), Arc::clone(&users)),
            validator: TokenValidator::new(codec.clone(), Arc::clone(&store)),
            logout: LogoutService::new(codec, Arc::clone(&store), Arc::clone(&users)),
            store,
            users,
        }
    }
}
