//! Email & MailTransport - 메일 메시지와 전송 인터페이스

use async_trait::async_trait;
use parking_lot::Mutex;
use politeia_foundation::Result;
use serde::Serialize;
use tracing::info;

/// 작성된 메일 한 통 (여러 수신자에게 한 번에 전송)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Email {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            recipients: Vec::new(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    pub fn to(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }
}

/// 메일 전송 인터페이스 (SMTP 등 외부 구현)
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &Email) -> Result<()>;
}

// ============================================================================
// LogTransport
// ============================================================================

/// 메일을 로그로만 남기는 전송 (dry run)
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, email: &Email) -> Result<()> {
        info!(
            recipients = email.recipients.len(),
            subject = %email.subject,
            "Mail (dry run)"
        );
        Ok(())
    }
}

// ============================================================================
// OutboxTransport
// ============================================================================

/// 보낸 메일을 메모리에 쌓아두는 전송
#[derive(Debug, Default)]
pub struct OutboxTransport {
    sent: Mutex<Vec<Email>>,
}

impl OutboxTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

#[async_trait]
impl MailTransport for OutboxTransport {
    async fn send(&self, email: &Email) -> Result<()> {
        self.sent.lock().push(email.clone());
        Ok(())
    }
}
