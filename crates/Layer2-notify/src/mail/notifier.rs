//! Email Notifier - Mailer 구현
//!
//! 알림 종류별로 수신자를 고르고(NotificationFlags), 메일을 작성해 전송합니다.

use super::email::{Email, MailTransport};
use super::templates;
use async_trait::async_trait;
use politeia_foundation::{
    Error, Mailer, NotificationFlags, ProposalRecord, RecordStore, Result, User,
};
use std::sync::Arc;
use tracing::debug;

/// 템플릿 기반 Mailer
pub struct EmailNotifier {
    transport: Arc<dyn MailTransport>,
    records: Arc<dyn RecordStore>,
    web_server_address: String,
}

impl EmailNotifier {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        records: Arc<dyn RecordStore>,
        web_server_address: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            records,
            web_server_address: web_server_address.into(),
        }
    }

    fn link(&self, token: &str) -> String {
        templates::proposal_link(&self.web_server_address, token)
    }

    /// 수신자가 없으면 보내지 않음
    async fn deliver(&self, recipients: Vec<String>, (subject, body): (String, String)) -> Result<()> {
        if recipients.is_empty() {
            debug!(subject = %subject, "No recipients; skipping mail");
            return Ok(());
        }

        let email = Email::new(subject, body).to(recipients);
        self.transport
            .send(&email)
            .await
            .map_err(|e| match e {
                Error::Mail(_) => e,
                other => Error::mail(other.to_string()),
            })
    }

    /// 플래그가 설정된 관리자들
    async fn admins_with(&self, flag: u64) -> Result<Vec<String>> {
        Ok(self
            .records
            .users()
            .await?
            .into_iter()
            .filter(|u| u.admin && u.wants(flag))
            .map(|u| u.email)
            .collect())
    }

    /// 플래그가 설정된 일반 사용자들 (제외 대상 빼고)
    async fn users_with(&self, flag: u64, exclude: &[&User]) -> Result<Vec<String>> {
        Ok(self
            .records
            .users()
            .await?
            .into_iter()
            .filter(|u| u.wants(flag) && !exclude.iter().any(|x| x.id == u.id))
            .map(|u| u.email)
            .collect())
    }

    fn author_if(author: &User, flag: u64) -> Vec<String> {
        if author.wants(flag) {
            vec![author.email.clone()]
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl Mailer for EmailNotifier {
    async fn notify_admins_new_proposal(
        &self,
        token: &str,
        name: &str,
        username: &str,
        email: &str,
    ) -> Result<()> {
        let recipients = self.admins_with(NotificationFlags::ADMIN_PROPOSAL_NEW).await?;
        let message = templates::admins_new_proposal(&self.link(token), name, username, email);
        self.deliver(recipients, message).await
    }

    async fn notify_author_proposal_vetted(
        &self,
        proposal: &ProposalRecord,
        author: &User,
        _admin: &User,
    ) -> Result<()> {
        let recipients = Self::author_if(author, NotificationFlags::MY_PROPOSAL_STATUS_CHANGE);
        let message = templates::author_proposal_vetted(&self.link(proposal.token()), proposal);
        self.deliver(recipients, message).await
    }

    async fn notify_users_proposal_vetted(
        &self,
        proposal: &ProposalRecord,
        author: &User,
        admin: &User,
    ) -> Result<()> {
        let recipients = self
            .users_with(NotificationFlags::REGULAR_PROPOSAL_VETTED, &[author, admin])
            .await?;
        let message =
            templates::users_proposal_vetted(&self.link(proposal.token()), proposal, author);
        self.deliver(recipients, message).await
    }

    async fn notify_author_proposal_censored(
        &self,
        proposal: &ProposalRecord,
        author: &User,
        _admin: &User,
        reason: &str,
    ) -> Result<()> {
        let recipients = Self::author_if(author, NotificationFlags::MY_PROPOSAL_STATUS_CHANGE);
        let message =
            templates::author_proposal_censored(&self.link(proposal.token()), proposal, reason);
        self.deliver(recipients, message).await
    }

    async fn notify_users_proposal_edited(
        &self,
        proposal: &ProposalRecord,
        author: &User,
    ) -> Result<()> {
        let recipients = self
            .users_with(NotificationFlags::REGULAR_PROPOSAL_EDITED, &[author])
            .await?;
        let message =
            templates::users_proposal_edited(&self.link(proposal.token()), proposal, author);
        self.deliver(recipients, message).await
    }

    async fn notify_users_vote_started(
        &self,
        proposal: &ProposalRecord,
        author: &User,
        admin: &User,
    ) -> Result<()> {
        let link = self.link(proposal.token());

        let author_recipients = Self::author_if(author, NotificationFlags::MY_PROPOSAL_VOTE_STARTED);
        self.deliver(author_recipients, templates::author_vote_started(&link, proposal))
            .await?;

        let recipients = self
            .users_with(NotificationFlags::REGULAR_PROPOSAL_VOTE_STARTED, &[author, admin])
            .await?;
        self.deliver(recipients, templates::users_vote_started(&link, proposal))
            .await
    }

    async fn notify_admins_vote_authorized(
        &self,
        proposal: &ProposalRecord,
        author: &User,
    ) -> Result<()> {
        let recipients = self
            .admins_with(NotificationFlags::ADMIN_PROPOSAL_VOTE_AUTHORIZED)
            .await?;
        let message =
            templates::admins_vote_authorized(&self.link(proposal.token()), proposal, author);
        self.deliver(recipients, message).await
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::OutboxTransport;
    use politeia_foundation::{InMemoryRecordStore, ProposalStatus};

    struct Fixture {
        outbox: Arc<OutboxTransport>,
        notifier: EmailNotifier,
        author: User,
        admin: User,
        reader: User,
    }

    async fn fixture() -> Fixture {
        let author = User::new("author", "author@example.com")
            .with_notifications(NotificationFlags::ALL);
        let admin = User::new("admin", "admin@example.com")
            .with_admin(true)
            .with_notifications(NotificationFlags::ALL);
        let reader = User::new("reader", "reader@example.com").with_notifications(
            NotificationFlags::REGULAR_PROPOSAL_VETTED
                | NotificationFlags::REGULAR_PROPOSAL_VOTE_STARTED,
        );
        let quiet = User::new("quiet", "quiet@example.com");

        let store = InMemoryRecordStore::new();
        for user in [&author, &admin, &reader, &quiet] {
            store.insert_user(user.clone()).await;
        }

        let outbox = Arc::new(OutboxTransport::new());
        let notifier = EmailNotifier::new(outbox.clone(), Arc::new(store), "https://politeia.test");

        Fixture {
            outbox,
            notifier,
            author,
            admin,
            reader,
        }
    }

    #[tokio::test]
    async fn test_admins_new_proposal_goes_to_admins_only() {
        let f = fixture().await;

        f.notifier
            .notify_admins_new_proposal("abc123", "Fund it", "author", "author@example.com")
            .await
            .unwrap();

        let sent = f.outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec![f.admin.email.clone()]);
        assert!(sent[0].body.contains("https://politeia.test/proposals/abc123"));
    }

    #[tokio::test]
    async fn test_users_vetted_excludes_author_and_admin() {
        let f = fixture().await;
        let proposal =
            ProposalRecord::new("Fund it", "abc123", ProposalStatus::Public).with_author(&f.author);

        f.notifier
            .notify_users_proposal_vetted(&proposal, &f.author, &f.admin)
            .await
            .unwrap();

        let sent = f.outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec![f.reader.email.clone()]);
        assert_eq!(sent[0].subject, "New Proposal Published");
    }

    #[tokio::test]
    async fn test_no_recipients_sends_nothing() {
        let f = fixture().await;
        let proposal = ProposalRecord::new("Fund it", "abc123", ProposalStatus::Public);

        // reader는 수정 알림을 구독하지 않음
        f.notifier
            .notify_users_proposal_edited(&proposal, &f.author)
            .await
            .unwrap();
        assert!(f.outbox.is_empty());

        // quiet 작성자는 상태 변경 알림을 받지 않음
        let quiet = User::new("quiet", "quiet@example.com");
        f.notifier
            .notify_author_proposal_censored(&proposal, &quiet, &f.admin, "spam")
            .await
            .unwrap();
        assert!(f.outbox.is_empty());
    }

    #[tokio::test]
    async fn test_vote_started_author_and_users() {
        let f = fixture().await;
        let proposal =
            ProposalRecord::new("Fund it", "abc123", ProposalStatus::Public).with_author(&f.author);

        f.notifier
            .notify_users_vote_started(&proposal, &f.author, &f.admin)
            .await
            .unwrap();

        let sent = f.outbox.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].subject, "Voting Started for Your Proposal");
        assert_eq!(sent[1].recipients, vec![f.reader.email.clone()]);
    }
}
