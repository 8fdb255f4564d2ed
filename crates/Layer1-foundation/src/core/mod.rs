//! Core Module - 도메인 타입 및 협력자 인터페이스
//!
//! - `types.rs`: payload에 실리는 데이터 타입 (User, ProposalRecord, StartVote 등)
//! - `traits.rs`: 외부 협력자 인터페이스 (RecordStore, Mailer, AdminLog)

pub mod traits;
pub mod types;

// ============================================================================
// Types - 데이터 타입 (types.rs)
// ============================================================================

// User
pub use types::{NotificationFlags, User, UserId};

// Proposal
pub use types::{CensorshipRecord, ProposalRecord, ProposalStatus, SetProposalStatus};

// Vote
pub use types::{AuthorizeVote, AuthorizeVoteAction, StartVote, Vote, VoteOption};

// User management
pub use types::{ManageUser, UserManageAction};

// ============================================================================
// Traits - 협력자 인터페이스 (traits.rs)
// ============================================================================

pub use traits::{AdminLog, Mailer, RecordStore};
