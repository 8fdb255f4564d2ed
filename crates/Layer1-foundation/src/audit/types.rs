//! Audit Log Types - 관리자 감사 로그 타입 정의

use crate::core::{User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Audit Entry ID
// ============================================================================

/// 감사 로그 엔트리 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditId(pub String);

impl AuditId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for AuditId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuditId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Audit Subject
// ============================================================================

/// 관리자 액션의 대상
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditSubject {
    /// 제안서 (token)
    Proposal { token: String },
    /// 사용자
    User { id: UserId, username: String },
}

impl AuditSubject {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Proposal { .. } => "proposal",
            Self::User { .. } => "user",
        }
    }

    /// 식별자 (token 또는 사용자 ID)
    pub fn key(&self) -> String {
        match self {
            Self::Proposal { token } => token.clone(),
            Self::User { id, .. } => id.to_string(),
        }
    }
}

// ============================================================================
// Audit Entry
// ============================================================================

/// 관리자 감사 로그 엔트리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditId,
    pub timestamp: DateTime<Utc>,
    pub admin_id: UserId,
    pub admin_username: String,
    pub subject: AuditSubject,
    pub action: String,
    pub reason: String,
}

impl AuditEntry {
    /// 제안서 액션 엔트리
    pub fn proposal(admin: &User, token: &str, action: &str, reason: &str) -> Self {
        Self::new(
            admin,
            AuditSubject::Proposal {
                token: token.to_string(),
            },
            action,
            reason,
        )
    }

    /// 사용자 액션 엔트리
    pub fn user(admin: &User, target: &User, action: &str, reason: &str) -> Self {
        Self::new(
            admin,
            AuditSubject::User {
                id: target.id,
                username: target.username.clone(),
            },
            action,
            reason,
        )
    }

    fn new(admin: &User, subject: AuditSubject, action: &str, reason: &str) -> Self {
        Self {
            id: AuditId::new(),
            timestamp: Utc::now(),
            admin_id: admin.id,
            admin_username: admin.username.clone(),
            subject,
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    /// 관리자 로그 파일 한 줄
    ///
    /// `<UTC 시각>,<관리자 ID>,<관리자 이름>,<내용>`
    /// - 제안서: `<action>,<token>,<reason>`
    /// - 사용자: `<action>,<대상 ID>,<대상 이름>,<reason>`
    pub fn to_line(&self) -> String {
        let content = match &self.subject {
            AuditSubject::Proposal { token } => {
                format!("{},{},{}", self.action, token, self.reason)
            }
            AuditSubject::User { id, username } => {
                format!("{},{},{},{}", self.action, id, username, self.reason)
            }
        };

        format!(
            "{},{},{},{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.admin_id,
            self.admin_username,
            content
        )
    }
}
