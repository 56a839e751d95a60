//! 토큰 저장소 추상화
//!
//! 토큰 레코드, 블랙리스트, 체크리스트를 다루는 [`TokenStore`] trait과
//! 여러 쓰기를 하나의 원자적 단위로 묶는 [`StoreTransaction`]을 정의합니다.
//!
//! # 원자성
//!
//! 모든 쓰기는 [`WriteBatch`]로 표현되며 구현체의 [`TokenStore::apply`]가
//! 배치 전체를 적용하거나 아무것도 적용하지 않습니다.
//! 블랙리스트의 유일성(jti당 하나)도 `apply` 안에서 검사되므로
//! 같은 토큰에 대한 동시 `add_to_blacklist` 중 하나만 성공합니다.
//!
//! ```rust,ignore
//! let mut txn = store.begin();
//! txn.add_to_blacklist(&access_token);
//! txn.add_to_blacklist(&refresh_token);
//! txn.commit().await?; // 둘 다 성공하거나 둘 다 실패
//! ```

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::models::token::{BlacklistEntry, ChecklistEntry, Token, TokenType};
use crate::errors::{AppError, AppResult};

/// 주체/타입별로 보관하는 최근 발급 이력의 최대 길이
///
/// 로그아웃은 가장 최근 항목만 사용합니다.
pub const LAST_TOKENS_LIMIT: usize = 10;

/// 배치에 포함되는 단일 쓰기
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// 새 토큰 레코드 저장 (jti 중복 불가)
    SaveToken(Token),
    /// 블랙리스트 등록 (토큰이 존재해야 하며 jti당 한 번)
    Blacklist(BlacklistEntry),
    /// (주체, 타입)의 체크리스트 마커 교체
    Checklist(ChecklistEntry),
}

impl WriteOp {
    pub fn jti(&self) -> &str {
        match self {
            WriteOp::SaveToken(token) => &token.jti,
            WriteOp::Blacklist(entry) => &entry.jti,
            WriteOp::Checklist(entry) => &entry.jti,
        }
    }
}

/// 원자적으로 적용될 쓰기 목록 (적용 순서 유지)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: WriteOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// 같은 배치 안에서 먼저 저장되는 토큰인지 확인
    pub fn saves_jti(&self, jti: &str) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, WriteOp::SaveToken(token) if token.jti == jti))
    }
}

/// 토큰 저장소
///
/// 구현체는 여러 워커 스레드에서 공유되므로 `Send + Sync`여야 합니다.
/// 저장소 장애는 항상 [`AppError::DatabaseConnectionError`]로 보고되며
/// 내부에서 재시도하지 않습니다.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// jti로 토큰 레코드를 조회합니다. 없으면 `NotFound`
    async fn get_by_jti(&self, jti: &str) -> AppResult<Token>;

    async fn exists_in_blacklist(&self, jti: &str) -> AppResult<bool>;

    /// 주체의 해당 타입 토큰 목록 (최근 발급 순, 최대 [`LAST_TOKENS_LIMIT`]개)
    async fn get_last_tokens(&self, subject: &str, token_type: TokenType) -> AppResult<Vec<Token>>;

    /// 토큰이 자신의 (주체, 타입)에 대한 현재 체크리스트 마커인지 확인
    async fn exists_in_checklist(&self, jti: &str) -> AppResult<bool>;

    /// 배치를 원자적으로 적용합니다.
    ///
    /// - 블랙리스트 중복: `AlreadyBlacklisted`
    /// - 참조하는 토큰 없음: `NotFound`
    /// - 저장소 장애: `DatabaseConnectionError`
    ///
    /// 어떤 에러든 반환되면 배치의 어떤 쓰기도 반영되지 않습니다.
    async fn apply(&self, batch: WriteBatch) -> AppResult<()>;

    /// 새 토큰 레코드를 저장합니다.
    async fn save(&self, token: Token) -> AppResult<Token> {
        let mut batch = WriteBatch::new();
        batch.push(WriteOp::SaveToken(token.clone()));
        self.apply(batch).await?;
        Ok(token)
    }

    /// 토큰을 블랙리스트에 등록합니다.
    async fn add_to_blacklist(&self, token: &Token) -> AppResult<BlacklistEntry> {
        let entry = BlacklistEntry::for_token(token, Utc::now());
        let mut batch = WriteBatch::new();
        batch.push(WriteOp::Blacklist(entry.clone()));
        self.apply(batch).await?;
        Ok(entry)
    }

    /// 토큰을 (주체, 타입)의 현재 체크리스트 마커로 등록합니다.
    async fn add_to_checklist(&self, token: &Token) -> AppResult<ChecklistEntry> {
        let entry = checklist_entry(token)?;
        let mut batch = WriteBatch::new();
        batch.push(WriteOp::Checklist(entry.clone()));
        self.apply(batch).await?;
        Ok(entry)
    }
}

impl dyn TokenStore {
    /// 새 트랜잭션을 시작합니다.
    pub fn begin(&self) -> StoreTransaction<'_> {
        StoreTransaction::new(self)
    }
}

fn checklist_entry(token: &Token) -> AppResult<ChecklistEntry> {
    ChecklistEntry::for_token(token, Utc::now()).ok_or_else(|| {
        AppError::ResourceNotFound(format!("token {} has no subject", token.jti))
    })
}

/// 스코프 기반 저장소 트랜잭션
///
/// 쓰기는 `commit` 전까지 스테이징만 됩니다.
/// 커밋되지 않은 채 drop 되면 스테이징된 쓰기는 모두 폐기됩니다 (rollback).
pub struct StoreTransaction<'a> {
    store: &'a dyn TokenStore,
    batch: WriteBatch,
    finished: bool,
}

impl<'a> StoreTransaction<'a> {
    pub fn new(store: &'a dyn TokenStore) -> Self {
        Self {
            store,
            batch: WriteBatch::new(),
            finished: false,
        }
    }

    pub fn save(&mut self, token: Token) {
        self.batch.push(WriteOp::SaveToken(token));
    }

    pub fn add_to_blacklist(&mut self, token: &Token) -> BlacklistEntry {
        let entry = BlacklistEntry::for_token(token, Utc::now());
        self.batch.push(WriteOp::Blacklist(entry.clone()));
        entry
    }

    pub fn add_to_checklist(&mut self, token: &Token) -> AppResult<ChecklistEntry> {
        let entry = checklist_entry(token)?;
        self.batch.push(WriteOp::Checklist(entry.clone()));
        Ok(entry)
    }

    /// 스테이징된 쓰기 수
    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    /// 스테이징된 모든 쓰기를 원자적으로 적용합니다.
    pub async fn commit(mut self) -> AppResult<()> {
        self.finished = true;
        let batch = std::mem::take(&mut self.batch);
        if batch.is_empty() {
            return Ok(());
        }

        let count = batch.len();
        match self.store.apply(batch).await {
            Ok(()) => {
                log::debug!("저장소 트랜잭션 커밋: {}건", count);
                Ok(())
            }
            Err(e) => {
                log::debug!("저장소 트랜잭션 실패, 전체 롤백: {}", e);
                Err(e)
            }
        }
    }

    /// 명시적 롤백
    pub fn rollback(mut self) {
        self.finished = true;
        log::debug!("저장소 트랜잭션 롤백: {}건 폐기", self.batch.len());
        self.batch = WriteBatch::new();
    }
}

impl Drop for StoreTransaction<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.batch.is_empty() {
            log::debug!("커밋되지 않은 저장소 트랜잭션 폐기: {}건", self.batch.len());
        }
    }
}
