//! 프로세스 메모리 기반 토큰 저장소
//!
//! 단일 프로세스 개발 환경(`TOKEN_STORE=memory`)과 테스트에서 사용합니다.
//! 하나의 `RwLock` 쓰기 잠금 안에서 배치 전체를 먼저 검증한 뒤 제자리에서 적용하므로
//! 배치 단위 원자성과 jti별 블랙리스트 유일성이 보장됩니다.
//! 적용 비용은 배치 크기에만 비례합니다.
//!
//! [`FailPoint`]로 저장소 장애를 주입하여 롤백 경로를 검증할 수 있습니다.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::models::token::{BlacklistEntry, ChecklistEntry, Token, TokenType};
use crate::errors::{AppError, AppResult};
use crate::repositories::tokens::token_store::{TokenStore, WriteBatch, WriteOp, LAST_TOKENS_LIMIT};

/// 주입할 장애 지점
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// 블랙리스트 쓰기가 `after`건 성공한 뒤부터 실패
    Blacklist { after: usize },
    /// 토큰 저장이 `after`건 성공한 뒤부터 실패
    Save { after: usize },
    /// 모든 읽기/쓰기 실패
    Everything,
}

#[derive(Debug, Default)]
struct State {
    tokens: HashMap<String, Token>,
    /// (주체, 타입) → jti 목록 (최근 발급 순, 최대 `LAST_TOKENS_LIMIT`개)
    by_subject: HashMap<(String, TokenType), VecDeque<String>>,
    blacklist: HashMap<String, BlacklistEntry>,
    checklist: HashMap<(String, TokenType), ChecklistEntry>,
}

/// 메모리 토큰 저장소
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    state: RwLock<State>,
    fail_point: RwLock<Option<FailPoint>>,
    blacklist_writes: AtomicUsize,
    save_writes: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 장애 지점을 설정합니다. 쓰기 카운터는 초기화됩니다.
    pub fn fail_on(&self, fail_point: FailPoint) {
        self.blacklist_writes.store(0, Ordering::SeqCst);
        self.save_writes.store(0, Ordering::SeqCst);
        if let Ok(mut guard) = self.fail_point.write() {
            *guard = Some(fail_point);
        }
    }

    /// 장애 주입 해제
    pub fn heal(&self) {
        if let Ok(mut guard) = self.fail_point.write() {
            *guard = None;
        }
    }

    pub fn token_count(&self) -> usize {
        self.read().map(|state| state.tokens.len()).unwrap_or(0)
    }

    pub fn blacklist_count(&self) -> usize {
        self.read().map(|state| state.blacklist.len()).unwrap_or(0)
    }

    fn current_fail_point(&self) -> Option<FailPoint> {
        self.fail_point.read().ok().and_then(|guard| *guard)
    }

    fn check_available(&self) -> AppResult<()> {
        match self.current_fail_point() {
            Some(FailPoint::Everything) => Err(injected("store unavailable")),
            _ => Ok(()),
        }
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| AppError::DatabaseConnectionError("token store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| AppError::DatabaseConnectionError("token store lock poisoned".to_string()))
    }

    fn count_write(&self, op: &WriteOp) -> AppResult<()> {
        match (self.current_fail_point(), op) {
            (Some(FailPoint::Everything), _) => Err(injected("write rejected")),
            (Some(FailPoint::Blacklist { after }), WriteOp::Blacklist(_)) => {
                if self.blacklist_writes.fetch_add(1, Ordering::SeqCst) >= after {
                    Err(injected("blacklist write failed"))
                } else {
                    Ok(())
                }
            }
            (Some(FailPoint::Save { after }), WriteOp::SaveToken(_)) => {
                if self.save_writes.fetch_add(1, Ordering::SeqCst) >= after {
                    Err(injected("token write failed"))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// 상태를 변경하지 않고 배치 전체의 전제 조건을 확인합니다.
    ///
    /// 같은 배치 안에서 앞서 저장되는 토큰은 존재하는 것으로 봅니다.
    fn check_batch(&self, state: &State, ops: &[WriteOp]) -> AppResult<()> {
        let mut saved = HashSet::new();
        let mut blacklisted = HashSet::new();

        for op in ops {
            self.count_write(op)?;

            let jti = op.jti();
            match op {
                WriteOp::SaveToken(_) => {
                    if state.tokens.contains_key(jti) || !saved.insert(jti) {
                        return Err(AppError::InternalError(format!("duplicate jti {}", jti)));
                    }
                }
                WriteOp::Blacklist(_) | WriteOp::Checklist(_) => {
                    if !state.tokens.contains_key(jti) && !saved.contains(jti) {
                        return Err(AppError::NotFound(format!("token {}", jti)));
                    }
                }
            }

            if let WriteOp::Blacklist(_) = op {
                if state.blacklist.contains_key(jti) || !blacklisted.insert(jti) {
                    return Err(AppError::AlreadyBlacklisted(jti.to_string()));
                }
            }
        }

        Ok(())
    }
}

impl State {
    fn apply_op(&mut self, op: WriteOp) {
        match op {
            WriteOp::SaveToken(token) => {
                if let Some(subject) = &token.subject {
                    let history = self
                        .by_subject
                        .entry((subject.clone(), token.token_type))
                        .or_default();
                    history.push_front(token.jti.clone());
                    history.truncate(LAST_TOKENS_LIMIT);
                }
                self.tokens.insert(token.jti.clone(), token);
            }
            WriteOp::Blacklist(entry) => {
                self.blacklist.insert(entry.jti.clone(), entry);
            }
            WriteOp::Checklist(entry) => {
                self.checklist
                    .insert((entry.subject.clone(), entry.token_type), entry);
            }
        }
    }
}

fn injected(what: &str) -> AppError {
    AppError::DatabaseConnectionError(format!("injected fault: {}", what))
}

fn is_current_marker(state: &State, token: &Token) -> bool {
    token
        .subject
        .as_ref()
        .and_then(|subject| state.checklist.get(&(subject.clone(), token.token_type)))
        .is_some_and(|entry| entry.jti == token.jti)
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get_by_jti(&self, jti: &str) -> AppResult<Token> {
        self.check_available()?;
        self.read()?
            .tokens
            .get(jti)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("token {}", jti)))
    }

    async fn exists_in_blacklist(&self, jti: &str) -> AppResult<bool> {
        self.check_available()?;
        Ok(self.read()?.blacklist.contains_key(jti))
    }

    async fn get_last_tokens(&self, subject: &str, token_type: TokenType) -> AppResult<Vec<Token>> {
        self.check_available()?;
        let state = self.read()?;
        let jtis = match state.by_subject.get(&(subject.to_string(), token_type)) {
            Some(jtis) => jtis,
            None => return Ok(Vec::new()),
        };

        Ok(jtis
            .iter()
            .filter_map(|jti| state.tokens.get(jti).cloned())
            .collect())
    }

    async fn exists_in_checklist(&self, jti: &str) -> AppResult<bool> {
        self.check_available()?;
        let state = self.read()?;
        Ok(state
            .tokens
            .get(jti)
            .is_some_and(|token| is_current_marker(&state, token)))
    }

    async fn apply(&self, batch: WriteBatch) -> AppResult<()> {
        let mut state = self.write()?;
        let ops = batch.into_ops();

        self.check_batch(&state, &ops)?;
        for op in ops {
            state.apply_op(op);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::user::UserRole;
    use crate::domain::models::token::TokenClaims;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn token(subject: &str, token_type: TokenType) -> Token {
        let claims = TokenClaims::new(subject, UserRole::Searcher, token_type, Utc::now(), Duration::minutes(5));
        Token::from_claims(format!("raw-{}", claims.jti), &claims)
    }

    #[actix_web::test]
    async fn test_last_tokens_are_most_recent_first() {
        let store = MemoryTokenStore::new();
        let first = token("user-1", TokenType::Access);
        let second = token("user-1", TokenType::Access);
        store.save(first.clone()).await.unwrap();
        store.save(second.clone()).await.unwrap();
        store.save(token("user-1", TokenType::Refresh)).await.unwrap();

        let last = store.get_last_tokens("user-1", TokenType::Access).await.unwrap();

        assert_eq!(last, vec![second, first]);
        assert!(store.get_last_tokens("nobody", TokenType::Access).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_last_tokens_history_is_bounded() {
        let store = MemoryTokenStore::new();
        let mut latest = None;
        for _ in 0..LAST_TOKENS_LIMIT + 5 {
            let t = token("user-1", TokenType::Access);
            store.save(t.clone()).await.unwrap();
            latest = Some(t);
        }

        let last = store.get_last_tokens("user-1", TokenType::Access).await.unwrap();

        assert_eq!(last.len(), LAST_TOKENS_LIMIT);
        assert_eq!(last.first(), latest.as_ref());
        assert_eq!(store.token_count(), LAST_TOKENS_LIMIT + 5);
    }

    #[actix_web::test]
    async fn test_batch_may_reference_token_saved_earlier_in_batch() {
        let store = MemoryTokenStore::new();
        let access = token("user-1", TokenType::Access);

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::SaveToken(access.clone()));
        batch.push(WriteOp::Checklist(ChecklistEntry::for_token(&access, Utc::now()).unwrap()));
        store.apply(batch).await.unwrap();

        assert!(store.exists_in_checklist(&access.jti).await.unwrap());
    }

    #[actix_web::test]
    async fn test_checklist_marker_is_replaced() {
        let store = MemoryTokenStore::new();
        let old = token("user-1", TokenType::Refresh);
        let new = token("user-1", TokenType::Refresh);
        for t in [&old, &new] {
            store.save(t.clone()).await.unwrap();
        }

        store.add_to_checklist(&old).await.unwrap();
        assert!(store.exists_in_checklist(&old.jti).await.unwrap());

        store.add_to_checklist(&new).await.unwrap();
        assert!(!store.exists_in_checklist(&old.jti).await.unwrap());
        assert!(store.exists_in_checklist(&new.jti).await.unwrap());
    }

    #[actix_web::test]
    async fn test_blacklist_requires_stored_token() {
        let store = MemoryTokenStore::new();
        let orphan = token("user-1", TokenType::Access);

        assert!(matches!(store.add_to_blacklist(&orphan).await, Err(AppError::NotFound(_))));
        assert_eq!(store.blacklist_count(), 0);
    }

    #[actix_web::test]
    async fn test_failed_batch_leaves_state_untouched() {
        let store = MemoryTokenStore::new();
        let access = token("user-1", TokenType::Access);
        let refresh = token("user-1", TokenType::Refresh);
        store.save(access.clone()).await.unwrap();
        store.save(refresh.clone()).await.unwrap();

        store.fail_on(FailPoint::Blacklist { after: 1 });
        let mut batch = WriteBatch::new();
        batch.push(WriteOp::Blacklist(BlacklistEntry::for_token(&access, Utc::now())));
        batch.push(WriteOp::Blacklist(BlacklistEntry::for_token(&refresh, Utc::now())));

        assert!(matches!(store.apply(batch).await, Err(AppError::DatabaseConnectionError(_))));
        store.heal();
        assert!(!store.exists_in_blacklist(&access.jti).await.unwrap());
        assert!(!store.exists_in_blacklist(&refresh.jti).await.unwrap());
    }

    #[actix_web::test]
    async fn test_duplicate_blacklist_in_one_batch_is_rejected() {
        let store = MemoryTokenStore::new();
        let access = token("user-1", TokenType::Access);
        store.save(access.clone()).await.unwrap();

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::Blacklist(BlacklistEntry::for_token(&access, Utc::now())));
        batch.push(WriteOp::Blacklist(BlacklistEntry::for_token(&access, Utc::now())));

        assert!(matches!(store.apply(batch).await, Err(AppError::AlreadyBlacklisted(_))));
        assert_eq!(store.blacklist_count(), 0);
    }

    #[actix_web::test]
    async fn test_everything_fault_fails_reads() {
        let store = MemoryTokenStore::new();
        store.fail_on(FailPoint::Everything);

        assert!(matches!(
            store.exists_in_blacklist("jti").await,
            Err(AppError::DatabaseConnectionError(_))
        ));
    }

    #[test]
    fn test_concurrent_blacklist_has_single_winner() {
        let store = Arc::new(MemoryTokenStore::new());
        let access = token("user-1", TokenType::Access);
        let runtime = actix_web::rt::Runtime::new().unwrap();
        runtime.block_on(store.save(access.clone())).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let access = access.clone();
                std::thread::spawn(move || {
                    let runtime = actix_web::rt::Runtime::new().unwrap();
                    runtime.block_on(store.add_to_blacklist(&access))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(winners, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AppError::AlreadyBlacklisted(_))));
        assert_eq!(store.blacklist_count(), 1);
    }
}
