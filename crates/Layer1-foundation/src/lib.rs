//! # politeia-foundation
//!
//! Foundation layer for the politeia event dispatcher:
//! - Core: 도메인 타입 (User, ProposalRecord, StartVote ...) 및 협력자 trait
//! - Event: 이벤트 종류/payload, 종류별 fan-out EventBus
//! - Audit: 관리자 감사 로그 (파일, SQLite)
//! - Storage: 인메모리 RecordStore, JsonStore
//! - Config: 통합 설정 (NotifyConfig)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Backend (상태 전이 완료)                                 │
//! │                     │ fire(kind, payload)               │
//! │                     ▼                                   │
//! │              EventBus (종류별 endpoint)                  │
//! │          ┌──────────┴──────────┐                        │
//! │          ▼                     ▼                        │
//! │   Email 핸들러            Audit 핸들러                    │
//! │   (Mailer)               (AdminLog)                     │
//! │          │                     │                        │
//! │          └──── RecordStore ────┘ (작성자/제안서 조회)     │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod config;
pub mod core;
pub mod error;
pub mod event;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Core (도메인 타입 및 협력자 Trait)
// ============================================================================
pub use core::{
    // Traits
    AdminLog,
    // Types - Vote
    AuthorizeVote,
    AuthorizeVoteAction,
    // Types - Proposal
    CensorshipRecord,
    // Types - User management
    ManageUser,
    Mailer,
    // Types - User
    NotificationFlags,
    ProposalRecord,
    ProposalStatus,
    RecordStore,
    SetProposalStatus,
    StartVote,
    User,
    UserId,
    UserManageAction,
    Vote,
    VoteOption,
};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{AuditBackend, NotifyConfig, SmtpConfig, NOTIFY_CONFIG_FILE};

// ============================================================================
// Event (이벤트 시스템)
// ============================================================================
pub use event::{
    // Bus
    Endpoint,
    EndpointId,
    EndpointReceiver,
    EventBus,
    EventBusConfig,
    // Types
    EventKind,
    EventPayload,
};

// ============================================================================
// Audit (감사 로깅)
// ============================================================================
pub use audit::{AdminLogFile, AuditEntry, AuditId, AuditSubject, SqliteAuditLog};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{InMemoryRecordStore, JsonStore, RecordFixture};
