//! Redis 기반 토큰 저장소
//!
//! 여러 워커/프로세스가 공유하는 기본 저장소입니다.
//!
//! # 키 구조
//!
//! | 키 | 값 |
//! |----|----|
//! | `jwt:token:{jti}` | 토큰 레코드 (JSON) |
//! | `jwt:user:{subject}:{type}` | jti 리스트 (LPUSH, 최근 발급 순) |
//! | `jwt:blacklist:{jti}` | 블랙리스트 엔트리 (JSON) |
//! | `jwt:checklist:{subject}:{type}` | 현재 유효한 jti |
//!
//! 배치는 하나의 Lua 스크립트로 실행됩니다. 스크립트는 모든 전제 조건을
//! 먼저 검사하고 하나라도 어긋나면 아무것도 쓰지 않고 반환하므로,
//! 배치 원자성과 블랙리스트 유일성이 Redis 서버에서 보장됩니다.
//!
//! 스크립트가 다루는 키는 모두 `KEYS`로 전달합니다. 한 배치의 키들은
//! 서로 다른 해시 슬롯에 속할 수 있으므로 Redis Cluster는 지원하지 않습니다.
//!
//! `jwt:user:*` 이력은 최근 [`LAST_TOKENS_LIMIT`]개만 유지합니다.

use std::collections::HashSet;

use async_trait::async_trait;
use redis::Script;

use crate::caching::redis::RedisClient;
use crate::domain::models::token::{Token, TokenType};
use crate::errors::{AppError, AppResult, ErrorContext};
use crate::repositories::tokens::token_store::{TokenStore, WriteBatch, WriteOp, LAST_TOKENS_LIMIT};

/// KEYS[i]에 대한 연산은 ARGV[2i] (op), ARGV[2i+1] (value)이며 ARGV[1]은 이력 길이 제한입니다.
///
/// - `insert`: 키가 없어야 함
/// - `require`: 키가 있어야 함
/// - `put`: SET
/// - `push`: LPUSH 후 LTRIM으로 최근 이력만 유지
///
/// 전제 조건 위반 시 `exists|{key}` 또는 `missing|{key}`, 성공 시 nil
const APPLY_BATCH_SCRIPT: &str = r#"
local limit = tonumber(ARGV[1])
for i = 1, #KEYS do
  local op = ARGV[i * 2]
  if op == 'insert' and redis.call('EXISTS', KEYS[i]) == 1 then
    return 'exists|' .. KEYS[i]
  elseif op == 'require' and redis.call('EXISTS', KEYS[i]) == 0 then
    return 'missing|' .. KEYS[i]
  end
end
for i = 1, #KEYS do
  local op, key, value = ARGV[i * 2], KEYS[i], ARGV[i * 2 + 1]
  if op == 'insert' or op == 'put' then
    redis.call('SET', key, value)
  elseif op == 'push' then
    redis.call('LPUSH', key, value)
    redis.call('LTRIM', key, 0, limit - 1)
  end
end
return false
"#;

const TOKEN_PREFIX: &str = "jwt:token:";
const BLACKLIST_PREFIX: &str = "jwt:blacklist:";

fn token_key(jti: &str) -> String {
    format!("{}{}", TOKEN_PREFIX, jti)
}

fn blacklist_key(jti: &str) -> String {
    format!("{}{}", BLACKLIST_PREFIX, jti)
}

fn subject_key(subject: &str, token_type: TokenType) -> String {
    format!("jwt:user:{}:{}", subject, token_type)
}

fn checklist_key(subject: &str, token_type: TokenType) -> String {
    format!("jwt:checklist:{}:{}", subject, token_type)
}

/// Redis 토큰 저장소
#[derive(Clone)]
pub struct RedisTokenStore {
    redis: RedisClient,
    apply_script: Script,
}

impl RedisTokenStore {
    pub fn new(redis: RedisClient) -> Self {
        Self {
            redis,
            apply_script: Script::new(APPLY_BATCH_SCRIPT),
        }
    }
}

/// 배치 스크립트 호출 인자
#[derive(Debug, PartialEq)]
struct ScriptCall {
    keys: Vec<String>,
    args: Vec<String>,
}

impl ScriptCall {
    fn new() -> Self {
        Self {
            keys: Vec::new(),
            args: vec![LAST_TOKENS_LIMIT.to_string()],
        }
    }

    fn push(&mut self, op: &str, key: String, value: String) {
        self.keys.push(key);
        self.args.push(op.to_string());
        self.args.push(value);
    }

    fn ops(&self) -> Vec<&str> {
        self.args.iter().skip(1).step_by(2).map(String::as_str).collect()
    }
}

/// 배치를 스크립트 인자로 변환합니다.
///
/// 같은 배치에서 저장되는 토큰은 `require` 검사를 생략합니다.
/// 배치 내부의 jti/블랙리스트 중복은 여기서 거부합니다.
fn script_args(batch: &WriteBatch) -> AppResult<ScriptCall> {
    let mut call = ScriptCall::new();
    let mut saved = HashSet::new();
    let mut blacklisted = HashSet::new();

    for op in batch.ops() {
        match op {
            WriteOp::SaveToken(token) => {
                if !saved.insert(token.jti.as_str()) {
                    return Err(AppError::InternalError(format!("duplicate jti {}", token.jti)));
                }
                let json = serde_json::to_string(token).context("token serialization")?;
                call.push("insert", token_key(&token.jti), json);
                if let Some(subject) = &token.subject {
                    call.push("push", subject_key(subject, token.token_type), token.jti.clone());
                }
            }
            WriteOp::Blacklist(entry) => {
                if !blacklisted.insert(entry.jti.as_str()) {
                    return Err(AppError::AlreadyBlacklisted(entry.jti.clone()));
                }
                if !saved.contains(entry.jti.as_str()) {
                    call.push("require", token_key(&entry.jti), String::new());
                }
                let json = serde_json::to_string(entry).context("blacklist serialization")?;
                call.push("insert", blacklist_key(&entry.jti), json);
            }
            WriteOp::Checklist(entry) => {
                if !saved.contains(entry.jti.as_str()) {
                    call.push("require", token_key(&entry.jti), String::new());
                }
                call.push("put", checklist_key(&entry.subject, entry.token_type), entry.jti.clone());
            }
        }
    }

    Ok(call)
}

/// 스크립트의 충돌 응답을 에러로 변환합니다.
fn conflict_error(reply: &str) -> AppError {
    match reply.split_once('|') {
        Some(("exists", key)) if key.starts_with(BLACKLIST_PREFIX) => {
            AppError::AlreadyBlacklisted(key[BLACKLIST_PREFIX.len()..].to_string())
        }
        Some(("exists", key)) => AppError::InternalError(format!("duplicate key {}", key)),
        Some(("missing", key)) => {
            AppError::NotFound(format!("token {}", key.trim_start_matches(TOKEN_PREFIX)))
        }
        _ => AppError::InternalError(format!("unexpected script reply: {}", reply)),
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn get_by_jti(&self, jti: &str) -> AppResult<Token> {
        self.redis
            .get::<Token>(&token_key(jti))
            .await
            .storage_context("token lookup")?
            .ok_or_else(|| AppError::NotFound(format!("token {}", jti)))
    }

    async fn exists_in_blacklist(&self, jti: &str) -> AppResult<bool> {
        self.redis
            .exists(&blacklist_key(jti))
            .await
            .storage_context("blacklist lookup")
    }

    async fn get_last_tokens(&self, subject: &str, token_type: TokenType) -> AppResult<Vec<Token>> {
        let jtis = self
            .redis
            .lrange(&subject_key(subject, token_type), 0, LAST_TOKENS_LIMIT as isize - 1)
            .await
            .storage_context("subject token lookup")?;
        let keys: Vec<String> = jtis.iter().map(|jti| token_key(jti)).collect();

        let tokens = self
            .redis
            .get_many::<Token>(&keys)
            .await
            .storage_context("token lookup")?;
        Ok(tokens.into_iter().flatten().collect())
    }

    async fn exists_in_checklist(&self, jti: &str) -> AppResult<bool> {
        let token = match self.get_by_jti(jti).await {
            Ok(token) => token,
            Err(AppError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        let subject = match &token.subject {
            Some(subject) => subject,
            None => return Ok(false),
        };

        let current = self
            .redis
            .get_string(&checklist_key(subject, token.token_type))
            .await
            .storage_context("checklist lookup")?;
        Ok(current.as_deref() == Some(jti))
    }

    async fn apply(&self, batch: WriteBatch) -> AppResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let call = script_args(&batch)?;

        match self
            .redis
            .eval_script(&self.apply_script, &call.keys, &call.args)
            .await
            .storage_context("token batch write")?
        {
            None => Ok(()),
            Some(reply) => Err(conflict_error(&reply)),
        }
    }
}
