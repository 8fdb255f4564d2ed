//! Mail - 알림 메일 작성 및 전송
//!
//! - `email.rs`: Email, MailTransport, LogTransport, OutboxTransport
//! - `templates.rs`: 알림 종류별 제목/본문
//! - `notifier.rs`: EmailNotifier (Mailer 구현, 수신자 결정)

mod email;
mod notifier;
pub mod templates;

pub use email::{Email, LogTransport, MailTransport, OutboxTransport};
pub use notifier::EmailNotifier;
