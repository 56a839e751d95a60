//! 애플리케이션 공유 상태
//!
//! 서비스 인스턴스는 시작 시 한 번 조립되어 `web::Data<AppState>`로
//! 모든 워커에 공유됩니다.

pub mod app_state;

pub use app_state::*;
