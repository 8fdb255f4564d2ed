//! Audit System - 관리자 감사 로그
//!
//! 제안서 상태 변경, 투표 시작, 사용자 관리 등 관리자 액션을 기록합니다.
//!
//! ## 백엔드
//!
//! | 백엔드 | 저장 위치 | 용도 |
//! |-------|----------|------|
//! | `AdminLogFile` | 추가 전용 텍스트 파일 | 기본값 |
//! | `SqliteAuditLog` | SQLite `admin_log` 테이블 | 조회가 필요한 경우 |
//!
//! ## 사용법
//!
//! ```ignore
//! use politeia_foundation::audit::AdminLogFile;
//! use politeia_foundation::AdminLog;
//!
//! let log = AdminLogFile::new("/var/log/politeia/admin.log");
//! log.append_proposal_action(&admin, "abc123", "start vote", "").await?;
//! ```

pub mod file;
pub mod logger;
pub mod types;

// Re-exports
pub use file::AdminLogFile;
pub use logger::SqliteAuditLog;
pub use types::{AuditEntry, AuditId, AuditSubject};
