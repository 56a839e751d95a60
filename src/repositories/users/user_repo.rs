//! # 사용자 조회 리포지토리
//!
//! 토큰 주체를 확인하기 위한 사용자 조회 계층입니다.
//! 이 크레이트는 사용자를 생성/삭제하지 않으므로 ID 조회만 제공합니다.
//!
//! - [`MongoUserRepository`]: MongoDB `users` 컬렉션 조회
//! - [`InMemoryUserRepository`]: 메모리 저장소 (개발/테스트용)

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};

use crate::db::Database;
use crate::domain::entities::users::user::User;
use crate::errors::{AppError, AppResult, ErrorContext};

/// 사용자 조회 협력자
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// ID로 사용자를 조회합니다.
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 ID의 사용자가 없거나 ID 형식이 잘못된 경우
    /// * `Err(AppError)` - 데이터베이스 오류
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
}

/// MongoDB 사용자 리포지토리
///
/// - **컬렉션명**: `users`
#[derive(Clone)]
pub struct MongoUserRepository {
    db: Arc<Database>,
}

impl MongoUserRepository {
    pub const COLLECTION: &'static str = "users";

    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> mongodb::Collection<User> {
        self.db.get_database().collection::<User>(Self::COLLECTION)
    }
}

#[async_trait]
impl UserLookup for MongoUserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = match ObjectId::parse_str(id) {
            Ok(object_id) => object_id,
            Err(_) => {
                log::debug!("유효하지 않은 사용자 ID 형식: {}", id);
                return Ok(None);
            }
        };

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .storage_context("user lookup")
    }
}

/// 메모리 사용자 리포지토리
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 사용자를 등록하고 ID 문자열을 반환합니다. ID가 없으면 새로 할당합니다.
    pub fn insert(&self, mut user: User) -> AppResult<String> {
        let id = *user.id.get_or_insert_with(ObjectId::new);
        let id = id.to_hex();
        self.users
            .write()
            .map_err(|_| AppError::InternalError("user store lock poisoned".to_string()))?
            .insert(id.clone(), user);
        Ok(id)
    }

    /// 사용자를 제거합니다. 토큰 레코드는 그대로 남습니다.
    pub fn remove(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .write()
            .map_err(|_| AppError::InternalError("user store lock poisoned".to_string()))?
            .remove(id))
    }
}

#[async_trait]
impl UserLookup for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .map_err(|_| AppError::InternalError("user store lock poisoned".to_string()))?
            .get(id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::user::UserRole;

    #[actix_web::test]
    async fn test_in_memory_lookup() {
        let repo = InMemoryUserRepository::new();
        let id = repo
            .insert(User::new("searcher@example.com".to_string(), UserRole::Searcher))
            .unwrap();

        let found = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.email, "searcher@example.com");
        assert_eq!(found.id_string(), Some(id.clone()));

        repo.remove(&id).unwrap();
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }
}
