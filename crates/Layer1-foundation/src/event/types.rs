//! Event Types - 이벤트 종류와 payload 정의
//!
//! 백엔드의 상태 전이(제안서 제출, 상태 변경, 수정, 투표 시작/승인, 사용자 관리)를
//! 나타내는 닫힌 이벤트 종류와, 종류별 payload 변형을 정의합니다.

use crate::core::{
    AuthorizeVote, CensorshipRecord, ManageUser, ProposalRecord, SetProposalStatus, StartVote,
    User,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Event Kind
// ============================================================================

/// 이벤트 종류 (조회 키로만 사용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Invalid,
    ProposalSubmitted,
    ProposalStatusChange,
    ProposalEdited,
    ProposalVoteStarted,
    ProposalVoteAuthorized,
    UserManage,
}

impl EventKind {
    /// `Invalid`을 제외한 모든 종류
    pub const ALL: [EventKind; 6] = [
        Self::ProposalSubmitted,
        Self::ProposalStatusChange,
        Self::ProposalEdited,
        Self::ProposalVoteStarted,
        Self::ProposalVoteAuthorized,
        Self::UserManage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::ProposalSubmitted => "proposal_submitted",
            Self::ProposalStatusChange => "proposal_status_change",
            Self::ProposalEdited => "proposal_edited",
            Self::ProposalVoteStarted => "proposal_vote_started",
            Self::ProposalVoteAuthorized => "proposal_vote_authorized",
            Self::UserManage => "user_manage",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payload 변형
// ============================================================================

/// 제안서 제출 (user는 발행 전에 완전히 조회되어 있어야 함)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSubmitted {
    pub censorship_record: CensorshipRecord,
    pub proposal_name: String,
    pub user: User,
}

/// 제안서 상태 변경
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalStatusChange {
    pub proposal: ProposalRecord,
    pub set_proposal_status: SetProposalStatus,
    pub admin_user: User,
}

/// 제안서 수정 (수정 후 레코드)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalEdited {
    pub proposal: ProposalRecord,
}

/// 투표 시작
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalVoteStarted {
    pub admin_user: User,
    pub start_vote: StartVote,
}

/// 투표 승인
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalVoteAuthorized {
    pub authorize_vote: AuthorizeVote,
    pub user: User,
}

/// 사용자 관리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserManage {
    pub admin_user: User,
    pub user: User,
    pub manage_user: ManageUser,
}

// ============================================================================
// EventPayload
// ============================================================================

/// 이벤트 payload (종류별 tagged union)
///
/// 버스에 넘겨진 뒤에는 불변 스냅샷으로 취급됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    ProposalSubmitted(ProposalSubmitted),
    ProposalStatusChange(ProposalStatusChange),
    ProposalEdited(ProposalEdited),
    ProposalVoteStarted(ProposalVoteStarted),
    ProposalVoteAuthorized(ProposalVoteAuthorized),
    UserManage(UserManage),
}

impl EventPayload {
    /// payload에 대응하는 이벤트 종류
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ProposalSubmitted(_) => EventKind::ProposalSubmitted,
            Self::ProposalStatusChange(_) => EventKind::ProposalStatusChange,
            Self::ProposalEdited(_) => EventKind::ProposalEdited,
            Self::ProposalVoteStarted(_) => EventKind::ProposalVoteStarted,
            Self::ProposalVoteAuthorized(_) => EventKind::ProposalVoteAuthorized,
            Self::UserManage(_) => EventKind::UserManage,
        }
    }

    /// 로그용 식별자 (제안서 token 또는 대상 사용자 ID)
    pub fn subject(&self) -> String {
        match self {
            Self::ProposalSubmitted(e) => e.censorship_record.token.clone(),
            Self::ProposalStatusChange(e) => e.proposal.token().to_string(),
            Self::ProposalEdited(e) => e.proposal.token().to_string(),
            Self::ProposalVoteStarted(e) => e.start_vote.vote.token.clone(),
            Self::ProposalVoteAuthorized(e) => e.authorize_vote.token.clone(),
            Self::UserManage(e) => e.user.id.to_string(),
        }
    }
}

impl From<ProposalSubmitted> for EventPayload {
    fn from(e: ProposalSubmitted) -> Self {
        Self::ProposalSubmitted(e)
    }
}

impl From<ProposalStatusChange> for EventPayload {
    fn from(e: ProposalStatusChange) -> Self {
        Self::ProposalStatusChange(e)
    }
}

impl From<ProposalEdited> for EventPayload {
    fn from(e: ProposalEdited) -> Self {
        Self::ProposalEdited(e)
    }
}

impl From<ProposalVoteStarted> for EventPayload {
    fn from(e: ProposalVoteStarted) -> Self {
        Self::ProposalVoteStarted(e)
    }
}

impl From<ProposalVoteAuthorized> for EventPayload {
    fn from(e: ProposalVoteAuthorized) -> Self {
        Self::ProposalVoteAuthorized(e)
    }
}

impl From<UserManage> for EventPayload {
    fn from(e: UserManage) -> Self {
        Self::UserManage(e)
    }
}

// ============================================================================
// 테스트
// ============================================================================
