//! Error types for the politeia event dispatcher
//!
//! 모든 에러를 중앙에서 관리

use crate::event::EventKind;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// politeia 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 저장소 / 조회 관련
    // ========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse UUID: {0}")]
    Uuid(#[from] uuid::Error),

    // ========================================================================
    // 이벤트 관련
    // ========================================================================
    #[error("Invalid event data: expected {expected}, got {got}")]
    InvalidEventData { expected: EventKind, got: EventKind },

    // ========================================================================
    // 외부 협력자 관련
    // ========================================================================
    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Audit log error: {0}")]
    AuditLog(String),

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 레코드 조회 실패인지 확인 (해당 payload만 포기)
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Uuid(_))
    }

    /// 외부 협력자(메일, 감사 로그) 호출 실패인지 확인
    pub fn is_collaborator(&self) -> bool {
        matches!(
            self,
            Error::Mail(_) | Error::AuditLog(_) | Error::Io(_) | Error::Sqlite(_)
        )
    }

    /// Not found 에러 생성 헬퍼
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    /// Mail 에러 생성 헬퍼
    pub fn mail(message: impl Into<String>) -> Self {
        Error::Mail(message.into())
    }
}
