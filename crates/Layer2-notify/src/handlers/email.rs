//! Email Reactions - 알림 메일 핸들러
//!
//! 메일이 설정되지 않은 경우 등록되지 않습니다 (초기화 시점에 결정).

use super::{unexpected, Reaction};
use async_trait::async_trait;
use politeia_foundation::{
    EventKind, EventPayload, Mailer, ProposalStatus, RecordStore, Result,
};
use std::sync::Arc;
use tracing::{debug, error, trace};

// ============================================================================
// ProposalSubmitted → 관리자
// ============================================================================

pub struct EmailProposalSubmitted {
    mailer: Arc<dyn Mailer>,
}

impl EmailProposalSubmitted {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl Reaction for EmailProposalSubmitted {
    fn name(&self) -> &'static str {
        "email_proposal_submitted"
    }

    fn kind(&self) -> EventKind {
        EventKind::ProposalSubmitted
    }

    async fn react(&self, payload: &EventPayload) -> Result<()> {
        let EventPayload::ProposalSubmitted(e) = payload else {
            return Err(unexpected(self.kind(), payload));
        };

        self.mailer
            .notify_admins_new_proposal(
                &e.censorship_record.token,
                &e.proposal_name,
                &e.user.username,
                &e.user.email,
            )
            .await
    }
}

// ============================================================================
// ProposalStatusChange → 작성자 (+ 공개 시 일반 사용자)
// ============================================================================

pub struct EmailProposalStatusChange {
    mailer: Arc<dyn Mailer>,
    records: Arc<dyn RecordStore>,
}

impl EmailProposalStatusChange {
    pub fn new(mailer: Arc<dyn Mailer>, records: Arc<dyn RecordStore>) -> Self {
        Self { mailer, records }
    }
}

#[async_trait]
impl Reaction for EmailProposalStatusChange {
    fn name(&self) -> &'static str {
        "email_proposal_status_change"
    }

    fn kind(&self) -> EventKind {
        EventKind::ProposalStatusChange
    }

    async fn react(&self, payload: &EventPayload) -> Result<()> {
        let EventPayload::ProposalStatusChange(e) = payload else {
            return Err(unexpected(self.kind(), payload));
        };

        let status = e.set_proposal_status.status;
        if !matches!(status, ProposalStatus::Public | ProposalStatus::Censored) {
            trace!(token = %e.proposal.token(), status = %status, "Status not mailed");
            return Ok(());
        }

        let author = self.records.proposal_author(&e.proposal).await?;

        match status {
            ProposalStatus::Public => {
                // 작성자 메일 실패가 일반 사용자 메일을 막지 않음
                if let Err(err) = self
                    .mailer
                    .notify_author_proposal_vetted(&e.proposal, &author, &e.admin_user)
                    .await
                {
                    error!(token = %e.proposal.token(), error = %err, "Author vetted mail failed");
                }
                self.mailer
                    .notify_users_proposal_vetted(&e.proposal, &author, &e.admin_user)
                    .await
            }
            _ => {
                self.mailer
                    .notify_author_proposal_censored(
                        &e.proposal,
                        &author,
                        &e.admin_user,
                        &e.set_proposal_status.message,
                    )
                    .await
            }
        }
    }
}

// ============================================================================
// ProposalEdited → 일반 사용자 (공개 제안서만)
// ============================================================================

pub struct EmailProposalEdited {
    mailer: Arc<dyn Mailer>,
    records: Arc<dyn RecordStore>,
}

impl EmailProposalEdited {
    pub fn new(mailer: Arc<dyn Mailer>, records: Arc<dyn RecordStore>) -> Self {
        Self { mailer, records }
    }
}

#[async_trait]
impl Reaction for EmailProposalEdited {
    fn name(&self) -> &'static str {
        "email_proposal_edited"
    }

    fn kind(&self) -> EventKind {
        EventKind::ProposalEdited
    }

    async fn react(&self, payload: &EventPayload) -> Result<()> {
        let EventPayload::ProposalEdited(e) = payload else {
            return Err(unexpected(self.kind(), payload));
        };

        if e.proposal.status != ProposalStatus::Public {
            debug!(token = %e.proposal.token(), status = %e.proposal.status, "Edited proposal not public");
            return Ok(());
        }

        let author = self.records.proposal_author(&e.proposal).await?;
        self.mailer
            .notify_users_proposal_edited(&e.proposal, &author)
            .await
    }
}

// ============================================================================
// ProposalVoteStarted → 작성자 + 일반 사용자
// ============================================================================

pub struct EmailProposalVoteStarted {
    mailer: Arc<dyn Mailer>,
    records: Arc<dyn RecordStore>,
}

impl EmailProposalVoteStarted {
    pub fn new(mailer: Arc<dyn Mailer>, records: Arc<dyn RecordStore>) -> Self {
        Self { mailer, records }
    }
}

#[async_trait]
impl Reaction for EmailProposalVoteStarted {
    fn name(&self) -> &'static str {
        "email_proposal_vote_started"
    }

    fn kind(&self) -> EventKind {
        EventKind::ProposalVoteStarted
    }

    async fn react(&self, payload: &EventPayload) -> Result<()> {
        let EventPayload::ProposalVoteStarted(e) = payload else {
            return Err(unexpected(self.kind(), payload));
        };

        // 인벤토리에서 현재 레코드를 다시 조회
        let proposal = self.records.proposal_by_token(&e.start_vote.vote.token).await?;
        let author = self.records.proposal_author(&proposal).await?;

        self.mailer
            .notify_users_vote_started(&proposal, &author, &e.admin_user)
            .await
    }
}

// ============================================================================
// ProposalVoteAuthorized → 관리자
// ============================================================================

pub struct EmailProposalVoteAuthorized {
    mailer: Arc<dyn Mailer>,
    records: Arc<dyn RecordStore>,
}

impl EmailProposalVoteAuthorized {
    pub fn new(mailer: Arc<dyn Mailer>, records: Arc<dyn RecordStore>) -> Self {
        Self { mailer, records }
    }
}

#[async_trait]
impl Reaction for EmailProposalVoteAuthorized {
    fn name(&self) -> &'static str {
        "email_proposal_vote_authorized"
    }

    fn kind(&self) -> EventKind {
        EventKind::ProposalVoteAuthorized
    }

    async fn react(&self, payload: &EventPayload) -> Result<()> {
        let EventPayload::ProposalVoteAuthorized(e) = payload else {
            return Err(unexpected(self.kind(), payload));
        };

        let proposal = self.records.proposal_by_token(&e.authorize_vote.token).await?;

        // 승인한 사용자가 작성자
        self.mailer
            .notify_admins_vote_authorized(&proposal, &e.user)
            .await
    }
}

// ============================================================================
// 테스트
// ============================================================================
