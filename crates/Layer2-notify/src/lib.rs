//! # politeia-notify
//!
//! 이벤트 버스에 연결되는 부수효과 핸들러:
//! - Handlers: 종류별 Reaction (이메일 알림, 관리자 감사 로그)
//! - Mail: EmailNotifier, 템플릿, MailTransport
//! - Manager: 버스 초기화, 조건부 등록, 종료
//!
//! ## 사용법
//!
//! ```ignore
//! use politeia_notify::{Collaborators, EventManager};
//!
//! let collaborators = Collaborators::new(records, admin_log).with_mailer(mailer);
//! let manager = EventManager::init(&config, collaborators);
//!
//! manager.publish(payload);
//! manager.shutdown().await;
//! ```

pub mod handlers;
pub mod mail;
pub mod manager;

pub use handlers::{spawn_reaction, Reaction};
pub use mail::{Email, EmailNotifier, LogTransport, MailTransport, OutboxTransport};
pub use manager::{admin_log_from_config, build_reactions, Collaborators, EventManager};
