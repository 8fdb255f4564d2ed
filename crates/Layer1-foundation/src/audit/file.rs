//! Admin Log File - 추가 전용 관리자 로그 파일

use super::types::AuditEntry;
use crate::core::{AdminLog, User};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// 관리자 로그 파일
///
/// 엔트리마다 한 줄씩 추가합니다. 동시 기록은 내부 Mutex로 직렬화됩니다.
pub struct AdminLogFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AdminLogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 엔트리 한 줄 추가
    pub async fn append(&self, entry: &AuditEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                Error::AuditLog(format!("open {}: {}", self.path.display(), e))
            })?;

        let mut line = entry.to_line();
        line.push('\n');
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| Error::AuditLog(format!("write {}: {}", self.path.display(), e)))?;
        file.flush().await?;

        debug!(
            audit_id = %entry.id,
            action = %entry.action,
            subject = %entry.subject.key(),
            "Admin action appended"
        );

        Ok(())
    }
}

#[async_trait]
impl AdminLog for AdminLogFile {
    async fn append_proposal_action(
        &self,
        admin: &User,
        token: &str,
        action: &str,
        reason: &str,
    ) -> Result<()> {
        self.append(&AuditEntry::proposal(admin, token, action, reason))
            .await
    }

    async fn append_user_action(
        &self,
        admin: &User,
        target: &User,
        action: &str,
        reason: &str,
    ) -> Result<()> {
        self.append(&AuditEntry::user(admin, target, action, reason))
            .await
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = AdminLogFile::new(dir.path().join("logs").join("admin.log"));

        let admin = User::new("admin", "admin@example.com").with_admin(true);
        let target = User::new("mallory", "mallory@example.com");

        log.append_proposal_action(&admin, "abc123", "start vote", "")
            .await
            .unwrap();
        log.append_user_action(&admin, &target, "lock", "policy violation")
            .await
            .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(",admin,start vote,abc123,"));
        assert!(lines[1].ends_with(&format!(",lock,{},mallory,policy violation", target.id)));
    }

    #[tokio::test]
    async fn test_unwritable_path_is_audit_error() {
        let dir = tempfile::tempdir().unwrap();
        // 디렉토리를 파일로 열 수 없음
        let log = AdminLogFile::new(dir.path());
        let admin = User::new("admin", "admin@example.com");

        let err = log
            .append_proposal_action(&admin, "abc123", "start vote", "")
            .await
            .unwrap_err();
        assert!(err.is_collaborator());
    }
}
