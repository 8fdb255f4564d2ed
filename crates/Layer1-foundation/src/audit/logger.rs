//! Audit Logger - SQLite 관리자 감사 로그
//!
//! 관리자 액션을 SQLite에 저장하고 조회하는 기능을 제공합니다.

use super::types::{AuditEntry, AuditId, AuditSubject};
use crate::core::{AdminLog, User, UserId};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// SQLite 감사 로그
///
/// ## 사용법
///
/// ```ignore
/// use politeia_foundation::audit::SqliteAuditLog;
///
/// let log = SqliteAuditLog::open("admin.db")?;
/// log.append_user_action(&admin, &target, "lock", "policy violation").await?;
///
/// let recent = log.recent(10).await?;
/// ```
pub struct SqliteAuditLog {
    /// SQLite 연결
    db: Mutex<Connection>,

    /// 데이터베이스 경로
    db_path: PathBuf,
}

impl SqliteAuditLog {
    /// 파일 데이터베이스 열기
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // 디렉토리 생성
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        Self::init_tables(&conn)?;

        info!(db_path = %db_path.display(), "Audit log initialized");

        Ok(Self {
            db: Mutex::new(conn),
            db_path,
        })
    }

    /// 인메모리 로그 생성 (테스트용)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_tables(&conn)?;

        Ok(Self {
            db: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// 테이블 초기화
    fn init_tables(db: &Connection) -> Result<()> {
        db.execute(
            r#"
            CREATE TABLE IF NOT EXISTS admin_log (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                admin_id TEXT NOT NULL,
                admin_username TEXT NOT NULL,
                subject_kind TEXT NOT NULL,
                subject_key TEXT NOT NULL,
                subject_name TEXT,
                action TEXT NOT NULL,
                reason TEXT NOT NULL
            )
            "#,
            [],
        )?;

        // 인덱스 생성
        db.execute(
            "CREATE INDEX IF NOT EXISTS idx_admin_log_timestamp ON admin_log(timestamp)",
            [],
        )?;
        db.execute(
            "CREATE INDEX IF NOT EXISTS idx_admin_log_subject ON admin_log(subject_key)",
            [],
        )?;

        Ok(())
    }

    /// 엔트리 기록
    pub async fn log(&self, entry: &AuditEntry) -> Result<AuditId> {
        let db = self.db.lock().await;

        let subject_name = match &entry.subject {
            AuditSubject::Proposal { .. } => None,
            AuditSubject::User { username, .. } => Some(username.clone()),
        };

        db.execute(
            r#"
            INSERT INTO admin_log (
                id, timestamp, admin_id, admin_username, subject_kind,
                subject_key, subject_name, action, reason
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                entry.id.0,
                entry.timestamp.to_rfc3339(),
                entry.admin_id.to_string(),
                entry.admin_username,
                entry.subject.kind(),
                entry.subject.key(),
                subject_name,
                entry.action,
                entry.reason,
            ],
        )
        .map_err(|e| Error::AuditLog(format!("insert admin_log: {}", e)))?;

        debug!(
            audit_id = %entry.id,
            action = %entry.action,
            subject = %entry.subject.key(),
            "Audit entry logged"
        );

        Ok(entry.id.clone())
    }

    /// 최근 엔트리 조회 (최신순)
    pub async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>> {
        let db = self.db.lock().await;

        let mut stmt = db.prepare(
            "SELECT id, timestamp, admin_id, admin_username, subject_kind, subject_key, \
             subject_name, action, reason FROM admin_log ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], Self::row_to_raw)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(Self::raw_to_entry(row?)?);
        }
        Ok(entries)
    }

    /// 특정 제안서/사용자에 대한 엔트리 수
    pub async fn count_for(&self, subject_key: &str) -> Result<u64> {
        let db = self.db.lock().await;
        let count: i64 = db.query_row(
            "SELECT COUNT(*) FROM admin_log WHERE subject_key = ?1",
            params![subject_key],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// 전체 엔트리 수
    pub async fn count(&self) -> Result<u64> {
        let db = self.db.lock().await;
        let count: i64 = db.query_row("SELECT COUNT(*) FROM admin_log", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawRow> {
        Ok(RawRow {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            admin_id: row.get(2)?,
            admin_username: row.get(3)?,
            subject_kind: row.get(4)?,
            subject_key: row.get(5)?,
            subject_name: row.get(6)?,
            action: row.get(7)?,
            reason: row.get(8)?,
        })
    }

    fn raw_to_entry(raw: RawRow) -> Result<AuditEntry> {
        let timestamp = DateTime::parse_from_rfc3339(&raw.timestamp)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| Error::Storage(format!("bad timestamp {}: {}", raw.timestamp, e)))?;

        let subject = match raw.subject_kind.as_str() {
            "user" => AuditSubject::User {
                id: UserId::parse(&raw.subject_key)?,
                username: raw.subject_name.unwrap_or_default(),
            },
            _ => AuditSubject::Proposal {
                token: raw.subject_key,
            },
        };

        Ok(AuditEntry {
            id: AuditId(raw.id),
            timestamp,
            admin_id: UserId::parse(&raw.admin_id)?,
            admin_username: raw.admin_username,
            subject,
            action: raw.action,
            reason: raw.reason,
        })
    }
}

struct RawRow {
    id: String,
    timestamp: String,
    admin_id: String,
    admin_username: String,
    subject_kind: String,
    subject_key: String,
    subject_name: Option<String>,
    action: String,
    reason: String,
}

#[async_trait]
impl AdminLog for SqliteAuditLog {
    async fn append_proposal_action(
        &self,
        admin: &User,
        token: &str,
        action: &str,
        reason: &str,
    ) -> Result<()> {
        self.log(&AuditEntry::proposal(admin, token, action, reason))
            .await
            .map(|_| ())
    }

    async fn append_user_action(
        &self,
        admin: &User,
        target: &User,
        action: &str,
        reason: &str,
    ) -> Result<()> {
        self.log(&AuditEntry::user(admin, target, action, reason))
            .await
            .map(|_| ())
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_audit_log_basic() {
        let log = SqliteAuditLog::in_memory().unwrap();
        let admin = User::new("admin", "admin@example.com").with_admin(true);

        log.append_proposal_action(&admin, "abc123", "set proposal status to public", "")
            .await
            .unwrap();

        let entries = log.recent(10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].admin_id, admin.id);
        assert_eq!(entries[0].action, "set proposal status to public");
        assert_eq!(
            entries[0].subject,
            AuditSubject::Proposal {
                token: "abc123".into()
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_audit_user_roundtrip() {
        let log = SqliteAuditLog::in_memory().unwrap();
        let admin = User::new("admin", "admin@example.com");
        let target = User::new("mallory", "mallory@example.com");

        log.append_user_action(&admin, &target, "lock", "policy violation")
            .await
            .unwrap();

        let entry = log.recent(1).await.unwrap().remove(0);
        assert_eq!(entry.reason, "policy violation");
        assert_eq!(
            entry.subject,
            AuditSubject::User {
                id: target.id,
                username: "mallory".into()
            }
        );
        assert_eq!(log.count_for(&target.id.to_string()).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_audit_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("admin.db");
        let admin = User::new("admin", "admin@example.com");

        {
            let log = SqliteAuditLog::open(&path).unwrap();
            for i in 0..3 {
                log.append_proposal_action(&admin, &format!("t{}", i), "start vote", "")
                    .await
                    .unwrap();
            }
        }

        // 다시 열어도 기록 유지
        let log = SqliteAuditLog::open(&path).unwrap();
        assert_eq!(log.count().await.unwrap(), 3);
        assert_eq!(log.recent(2).await.unwrap().len(), 2);
    }
}
