//! Core Types - 도메인 데이터 타입
//!
//! 이벤트 payload에 실리는 사용자/제안서/투표 스냅샷 타입들입니다.
//! 이벤트 시스템은 이 타입들을 읽기만 하며 절대 수정하지 않습니다.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// User
// ============================================================================

/// 사용자 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// 문자열 UUID 파싱
    pub fn parse(s: &str) -> crate::Result<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 이메일 알림 설정 비트마스크
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationFlags(pub u64);

impl NotificationFlags {
    pub const MY_PROPOSAL_STATUS_CHANGE: u64 = 1 << 0;
    pub const MY_PROPOSAL_VOTE_STARTED: u64 = 1 << 1;
    pub const REGULAR_PROPOSAL_VETTED: u64 = 1 << 2;
    pub const REGULAR_PROPOSAL_EDITED: u64 = 1 << 3;
    pub const REGULAR_PROPOSAL_VOTE_STARTED: u64 = 1 << 4;
    pub const ADMIN_PROPOSAL_NEW: u64 = 1 << 5;
    pub const ADMIN_PROPOSAL_VOTE_AUTHORIZED: u64 = 1 << 6;

    pub const ALL: u64 = (1 << 7) - 1;

    pub fn has(&self, flag: u64) -> bool {
        self.0 & flag != 0
    }
}

/// 사용자 레코드 (완전히 조회된 상태로 payload에 실림)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub email_notifications: NotificationFlags,
    #[serde(default)]
    pub public_keys: Vec<String>,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email: email.into(),
            admin: false,
            email_notifications: NotificationFlags::default(),
            public_keys: Vec::new(),
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    pub fn with_notifications(mut self, flags: u64) -> Self {
        self.email_notifications = NotificationFlags(flags);
        self
    }

    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_keys.push(key.into());
        self
    }

    /// 알림 플래그 확인
    pub fn wants(&self, flag: u64) -> bool {
        self.email_notifications.has(flag)
    }
}

// ============================================================================
// Proposal
// ============================================================================

/// 제안서 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Invalid,
    NotFound,
    NotReviewed,
    Censored,
    Public,
    UnreviewedChanges,
    Abandoned,
}

impl ProposalStatus {
    /// 사람이 읽는 상태 문자열 (관리자 로그에 기록됨)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::NotFound => "not found",
            Self::NotReviewed => "unreviewed",
            Self::Censored => "censored",
            Self::Public => "public",
            Self::UnreviewedChanges => "unreviewed changes",
            Self::Abandoned => "abandoned",
        }
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 검열 레코드 (token이 제안서의 식별자)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CensorshipRecord {
    pub token: String,
    #[serde(default)]
    pub merkle: String,
    #[serde(default)]
    pub signature: String,
}

impl CensorshipRecord {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }
}

/// 제안서 레코드
///
/// `user_id`가 비어 있으면 작성자는 `public_key`로 조회합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    pub name: String,
    pub status: ProposalStatus,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub censorship_record: CensorshipRecord,
}

fn default_version() -> String {
    "1".to_string()
}

impl ProposalRecord {
    pub fn new(name: impl Into<String>, token: impl Into<String>, status: ProposalStatus) -> Self {
        Self {
            name: name.into(),
            status,
            user_id: String::new(),
            username: String::new(),
            public_key: String::new(),
            version: default_version(),
            censorship_record: CensorshipRecord::new(token),
        }
    }

    pub fn with_author(mut self, author: &User) -> Self {
        self.user_id = author.id.to_string();
        self.username = author.username.clone();
        self
    }

    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = key.into();
        self
    }

    pub fn token(&self) -> &str {
        &self.censorship_record.token
    }
}

/// 제안서 상태 변경 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProposalStatus {
    pub token: String,
    pub status: ProposalStatus,
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Vote
// ============================================================================

/// 투표 선택지
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOption {
    pub id: String,
    pub description: String,
    pub bits: u64,
}

/// 투표 파라미터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub token: String,
    #[serde(default)]
    pub mask: u64,
    /// 블록 수
    pub duration: u32,
    pub quorum_percentage: u32,
    pub pass_percentage: u32,
    #[serde(default)]
    pub options: Vec<VoteOption>,
}

impl Vote {
    /// 기본 yes/no 투표
    pub fn yes_no(token: impl Into<String>, duration: u32) -> Self {
        Self {
            token: token.into(),
            mask: 0x3,
            duration,
            quorum_percentage: 20,
            pass_percentage: 60,
            options: vec![
                VoteOption {
                    id: "no".to_string(),
                    description: "Don't approve proposal".to_string(),
                    bits: 0x1,
                },
                VoteOption {
                    id: "yes".to_string(),
                    description: "Approve proposal".to_string(),
                    bits: 0x2,
                },
            ],
        }
    }
}

/// 투표 시작 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartVote {
    #[serde(default)]
    pub public_key: String,
    pub vote: Vote,
    #[serde(default)]
    pub signature: String,
}

/// 투표 승인 액션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizeVoteAction {
    Authorize,
    Revoke,
}

/// 투표 승인 요청 (작성자가 투표 시작을 승인)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeVote {
    pub token: String,
    pub action: AuthorizeVoteAction,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub signature: String,
}

// ============================================================================
// User management
// ============================================================================

/// 관리자의 사용자 관리 액션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserManageAction {
    ExpireNewUserVerification,
    ExpireUpdateKeyVerification,
    ExpireResetPasswordVerification,
    ClearUserPaywall,
    Lock,
    Unlock,
    Deactivate,
    Reactivate,
}

impl UserManageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpireNewUserVerification => "expire new user verification",
            Self::ExpireUpdateKeyVerification => "expire update user key verification",
            Self::ExpireResetPasswordVerification => "expire reset password verification",
            Self::ClearUserPaywall => "clear user paywall",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::Deactivate => "deactivate",
            Self::Reactivate => "reactivate",
        }
    }
}

impl std::fmt::Display for UserManageAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사용자 관리 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageUser {
    pub user_id: UserId,
    pub action: UserManageAction,
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_flags() {
        let user = User::new("alice", "alice@example.com").with_notifications(
            NotificationFlags::MY_PROPOSAL_STATUS_CHANGE | NotificationFlags::ADMIN_PROPOSAL_NEW,
        );

        assert!(user.wants(NotificationFlags::MY_PROPOSAL_STATUS_CHANGE));
        assert!(user.wants(NotificationFlags::ADMIN_PROPOSAL_NEW));
        assert!(!user.wants(NotificationFlags::REGULAR_PROPOSAL_EDITED));
        assert!(NotificationFlags(NotificationFlags::ALL).has(1 << 6));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(ProposalStatus::Censored.to_string(), "censored");
        assert_eq!(ProposalStatus::Public.as_str(), "public");
        assert_eq!(UserManageAction::Lock.to_string(), "lock");
    }

    #[test]
    fn test_proposal_serde() {
        let author = User::new("bob", "bob@example.com");
        let proposal =
            ProposalRecord::new("Fund it", "abc123", ProposalStatus::Public).with_author(&author);

        let json = serde_json::to_value(&proposal).unwrap();
        assert_eq!(json["censorshipRecord"]["token"], "abc123");
        assert_eq!(json["status"], "public");

        let back: ProposalRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, proposal);
        assert_eq!(back.token(), "abc123");
    }

    #[test]
    fn test_user_id_parse() {
        let id = UserId::new();
        assert_eq!(UserId::parse(&id.to_string()).unwrap(), id);
        assert!(UserId::parse("").is_err());
    }
}
