//! Config - 이벤트 디스패처 설정 관리
//!
//! - `notify.rs` - NotifyConfig (SMTP, 관리자 로그, 버스 설정)

mod notify;

pub use notify::{AuditBackend, NotifyConfig, SmtpConfig, NOTIFY_CONFIG_FILE};
