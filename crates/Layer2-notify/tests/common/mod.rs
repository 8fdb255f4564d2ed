//! 통합 테스트 공용 도우미

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use politeia_foundation::{
    AdminLog, InMemoryRecordStore, NotificationFlags, NotifyConfig, ProposalRecord,
    ProposalStatus, Result, SmtpConfig, User,
};
use politeia_notify::{Collaborators, EmailNotifier, OutboxTransport};
use std::sync::Arc;

/// 기록된 감사 로그 (admin, subject, action, reason)
pub type LoggedAction = (String, String, String, String);

/// 호출을 메모리에 기록하는 AdminLog
#[derive(Default)]
pub struct RecordingAdminLog {
    entries: Mutex<Vec<LoggedAction>>,
}

impl RecordingAdminLog {
    pub fn entries(&self) -> Vec<LoggedAction> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl AdminLog for RecordingAdminLog {
    async fn append_proposal_action(
        &self,
        admin: &User,
        token: &str,
        action: &str,
        reason: &str,
    ) -> Result<()> {
        self.entries.lock().push((
            admin.username.clone(),
            token.to_string(),
            action.to_string(),
            reason.to_string(),
        ));
        Ok(())
    }

    async fn append_user_action(
        &self,
        admin: &User,
        target: &User,
        action: &str,
        reason: &str,
    ) -> Result<()> {
        self.entries.lock().push((
            admin.username.clone(),
            target.username.clone(),
            action.to_string(),
            reason.to_string(),
        ));
        Ok(())
    }
}

/// 테스트 환경
pub struct Harness {
    pub admin: User,
    pub author: User,
    pub reader: User,
    pub proposal: ProposalRecord,
    pub outbox: Arc<OutboxTransport>,
    pub log: Arc<RecordingAdminLog>,
    pub collaborators: Collaborators,
}

impl Harness {
    pub async fn new() -> Self {
        let admin = User::new("alice", "alice@example.com")
            .with_admin(true)
            .with_notifications(NotificationFlags::ALL);
        let author = User::new("bob", "bob@example.com")
            .with_notifications(NotificationFlags::ALL)
            .with_public_key("pk-bob");
        let reader = User::new("carol", "carol@example.com")
            .with_notifications(NotificationFlags::ALL);
        let proposal = ProposalRecord::new("Marketing budget", "abc123", ProposalStatus::NotReviewed)
            .with_public_key("pk-bob");

        let store = InMemoryRecordStore::new();
        store.insert_user(admin.clone()).await;
        store.insert_user(author.clone()).await;
        store.insert_user(reader.clone()).await;
        store.insert_proposal(proposal.clone()).await;
        let records = Arc::new(store);

        let outbox = Arc::new(OutboxTransport::new());
        let log = Arc::new(RecordingAdminLog::default());
        let notifier = EmailNotifier::new(outbox.clone(), records.clone(), "https://politeia.test");

        let collaborators =
            Collaborators::new(records, log.clone()).with_mailer(Arc::new(notifier));

        Self {
            admin,
            author,
            reader,
            proposal,
            outbox,
            log,
            collaborators,
        }
    }

    /// 보낸 메일 제목 목록
    pub fn subjects(&self) -> Vec<String> {
        self.outbox.sent().into_iter().map(|e| e.subject).collect()
    }
}

pub fn mail_config() -> NotifyConfig {
    NotifyConfig::new().smtp(SmtpConfig::new("smtp.example.com", "noreply@example.com"))
}
