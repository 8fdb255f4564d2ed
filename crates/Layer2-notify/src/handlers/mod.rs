//! Reactions - 이벤트 종류별 부수효과 핸들러
//!
//! 각 Reaction은 한 종류의 이벤트만 구독하며, 전용 루프에서 자기 endpoint의
//! 수신측을 끝날 때까지 비웁니다. payload 하나의 실패는 로그로만 남기고
//! 다음 payload를 계속 처리합니다.
//!
//! ```text
//! EventBus ──(Arc<EventPayload>)──▶ endpoint rx ──▶ spawn_reaction 루프
//!                                                     │
//!                                                     ├─ react() Ok      → 다음
//!                                                     ├─ react() Err     → 분류 후 로그
//!                                                     └─ react() panic   → 로그
//! ```

mod audit;
mod email;

pub use audit::{AuditProposalStatusChange, AuditUserManage, AuditVoteStarted};
pub use email::{
    EmailProposalEdited, EmailProposalStatusChange, EmailProposalSubmitted,
    EmailProposalVoteAuthorized, EmailProposalVoteStarted,
};

use async_trait::async_trait;
use futures::FutureExt;
use politeia_foundation::{EndpointReceiver, Error, EventKind, EventPayload, Result};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

// ============================================================================
// Reaction Trait
// ============================================================================

/// 이벤트 하나에 대한 부수효과
#[async_trait]
pub trait Reaction: Send + Sync {
    /// 로그용 이름
    fn name(&self) -> &'static str;

    /// 구독하는 이벤트 종류
    fn kind(&self) -> EventKind;

    /// payload 하나 처리
    ///
    /// 에러는 루프에서 로그로 남으며 발행자에게 전달되지 않습니다.
    async fn react(&self, payload: &EventPayload) -> Result<()>;
}

/// 예상과 다른 payload 변형
pub(crate) fn unexpected(expected: EventKind, payload: &EventPayload) -> Error {
    Error::InvalidEventData {
        expected,
        got: payload.kind(),
    }
}

// ============================================================================
// Handler Loop
// ============================================================================

/// Reaction 루프 시작
///
/// 수신측이 닫히고 남은 큐가 비워지면 종료됩니다.
pub fn spawn_reaction(reaction: Arc<dyn Reaction>, mut rx: EndpointReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        let name = reaction.name();
        debug!(handler = name, kind = %reaction.kind(), "Handler started");

        while let Some(payload) = rx.recv().await {
            let outcome = AssertUnwindSafe(reaction.react(&payload))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => report(name, &payload, &e),
                Err(panic) => {
                    let info = if let Some(msg) = panic.downcast_ref::<&'static str>() {
                        (*msg).to_string()
                    } else if let Some(msg) = panic.downcast_ref::<String>() {
                        msg.clone()
                    } else {
                        "unknown panic".to_string()
                    };
                    error!(handler = name, subject = %payload.subject(), panic = %info, "Handler panicked");
                }
            }
        }

        debug!(handler = name, "Handler stopped");
    })
}

fn report(handler: &'static str, payload: &EventPayload, e: &Error) {
    let subject = payload.subject();

    match e {
        Error::InvalidEventData { .. } => {
            error!(handler, subject = %subject, error = %e, "Invalid event data");
        }
        e if e.is_lookup() => {
            warn!(handler, subject = %subject, error = %e, "Record lookup failed");
        }
        e if e.is_collaborator() => {
            error!(handler, subject = %subject, error = %e, "Side effect failed");
        }
        e => {
            error!(handler, subject = %subject, error = %e, "Handler failed");
        }
    }
}

// ============================================================================
// 테스트 더블
// ============================================================================
