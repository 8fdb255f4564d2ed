//! Audit Reactions - 관리자 감사 로그 핸들러
//!
//! 메일 설정과 무관하게 항상 등록됩니다.

use super::{unexpected, Reaction};
use async_trait::async_trait;
use politeia_foundation::{AdminLog, EventKind, EventPayload, Result};
use std::sync::Arc;

/// 투표 시작 액션 문자열
pub const START_VOTE_ACTION: &str = "start vote";

// ============================================================================
// ProposalStatusChange
// ============================================================================

pub struct AuditProposalStatusChange {
    log: Arc<dyn AdminLog>,
}

impl AuditProposalStatusChange {
    pub fn new(log: Arc<dyn AdminLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Reaction for AuditProposalStatusChange {
    fn name(&self) -> &'static str {
        "audit_proposal_status_change"
    }

    fn kind(&self) -> EventKind {
        EventKind::ProposalStatusChange
    }

    async fn react(&self, payload: &EventPayload) -> Result<()> {
        let EventPayload::ProposalStatusChange(e) = payload else {
            return Err(unexpected(self.kind(), payload));
        };

        let action = format!("set proposal status to {}", e.set_proposal_status.status);
        self.log
            .append_proposal_action(
                &e.admin_user,
                e.proposal.token(),
                &action,
                &e.set_proposal_status.message,
            )
            .await
    }
}

// ============================================================================
// ProposalVoteStarted
// ============================================================================

pub struct AuditVoteStarted {
    log: Arc<dyn AdminLog>,
}

impl AuditVoteStarted {
    pub fn new(log: Arc<dyn AdminLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Reaction for AuditVoteStarted {
    fn name(&self) -> &'static str {
        "audit_vote_started"
    }

    fn kind(&self) -> EventKind {
        EventKind::ProposalVoteStarted
    }

    async fn react(&self, payload: &EventPayload) -> Result<()> {
        let EventPayload::ProposalVoteStarted(e) = payload else {
            return Err(unexpected(self.kind(), payload));
        };

        self.log
            .append_proposal_action(&e.admin_user, &e.start_vote.vote.token, START_VOTE_ACTION, "")
            .await
    }
}

// ============================================================================
// UserManage
// ============================================================================

pub struct AuditUserManage {
    log: Arc<dyn AdminLog>,
}

impl AuditUserManage {
    pub fn new(log: Arc<dyn AdminLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl Reaction for AuditUserManage {
    fn name(&self) -> &'static str {
        "audit_user_manage"
    }

    fn kind(&self) -> EventKind {
        EventKind::UserManage
    }

    async fn react(&self, payload: &EventPayload) -> Result<()> {
        let EventPayload::UserManage(e) = payload else {
            return Err(unexpected(self.kind(), payload));
        };

        self.log
            .append_user_action(
                &e.admin_user,
                &e.user,
                e.manage_user.action.as_str(),
                &e.manage_user.reason,
            )
            .await
    }
}

// ============================================================================
// 테스트
// ============================================================================
