//! Event System - 이벤트 발행/구독 시스템
//!
//! 백엔드 상태 전이를 부수효과(이메일 알림, 감사 로그)와 분리합니다.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        EventBus                              │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │  fire(kind, payload) ─── 구독자마다 전달 태스크 1개    │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! │         │                                                   │
//! │         ▼                                                   │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │  Endpoint 1  │  │  Endpoint 2  │  │  Endpoint N  │      │
//! │  │  (Email)     │  │  (AuditLog)  │  │  ...         │      │
//! │  └──────────────┘  └──────────────┘  └──────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 사용법
//!
//! ```ignore
//! use politeia_foundation::event::{EventBus, EventKind, EventPayload, UserManage};
//!
//! // 1. 버스 생성 (시작 시 한 번)
//! let bus = Arc::new(EventBus::new());
//!
//! // 2. 핸들러 endpoint 등록
//! let (endpoint, mut rx) = bus.endpoint();
//! tokio::spawn(async move {
//!     while let Some(payload) = rx.recv().await {
//!         // 부수효과 1회
//!     }
//! });
//! bus.register(EventKind::UserManage, endpoint);
//!
//! // 3. 이벤트 발행
//! bus.publish(EventPayload::from(UserManage { .. }));
//! ```

pub mod bus;
pub mod types;

// Re-exports
pub use bus::{
    endpoint, Delivery, Endpoint, EndpointId, EndpointReceiver, EventBus, EventBusConfig,
};

pub use types::{
    // Core types
    EventKind,
    EventPayload,
    // Payload variants
    ProposalEdited,
    ProposalStatusChange,
    ProposalSubmitted,
    ProposalVoteAuthorized,
    ProposalVoteStarted,
    UserManage,
};
