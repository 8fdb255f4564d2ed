//! Core Traits - 외부 협력자 인터페이스 정의
//!
//! 이벤트 핸들러가 사용하는 좁은 인터페이스들입니다.
//! 이벤트 시스템은 레코드가 어떻게 저장되는지, 이메일이 어떻게 렌더링/전송되는지,
//! 감사 로그가 어디에 기록되는지 알지 못합니다.
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Layer2-Notify                                              │
//! │  ├── Reaction 핸들러 (email / audit)                         │
//! │  └── EmailNotifier (Mailer 구현)                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Layer1-Foundation (이 레이어)                              │
//! │  ├── RecordStore  (사용자/제안서 조회)                        │
//! │  ├── Mailer       (알림 종류별 메일 발송)                     │
//! │  └── AdminLog     (관리자 액션 기록)                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use super::types::{ProposalRecord, User, UserId};
use crate::Result;
use async_trait::async_trait;

// ============================================================================
// RecordStore - 레코드 조회
// ============================================================================

/// 사용자/제안서 레코드 저장소
///
/// 구현체는 자체 동시성 규칙(조회 시 공유 읽기)을 따르며,
/// 조회 결과는 소유권 있는 복사본으로 반환합니다.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// ID로 사용자 조회
    async fn user_by_id(&self, id: &UserId) -> Result<User>;

    /// 공개키로 사용자 ID 조회
    async fn user_id_by_public_key(&self, public_key: &str) -> Result<UserId>;

    /// token으로 제안서 조회 (인벤토리)
    async fn proposal_by_token(&self, token: &str) -> Result<ProposalRecord>;

    /// 전체 사용자 (알림 수신자 결정용)
    async fn users(&self) -> Result<Vec<User>>;

    /// 제안서 작성자 조회
    ///
    /// `user_id`가 비어 있으면 공개키 인덱스로 먼저 ID를 찾습니다.
    async fn proposal_author(&self, proposal: &ProposalRecord) -> Result<User> {
        let id = if proposal.user_id.is_empty() {
            self.user_id_by_public_key(&proposal.public_key).await?
        } else {
            UserId::parse(&proposal.user_id)?
        };
        self.user_by_id(&id).await
    }
}

// ============================================================================
// Mailer - 알림 메일
// ============================================================================

/// 알림 종류별 메일 발송
#[async_trait]
pub trait Mailer: Send + Sync {
    /// 새 제안서 제출 → 관리자들
    async fn notify_admins_new_proposal(
        &self,
        token: &str,
        name: &str,
        username: &str,
        email: &str,
    ) -> Result<()>;

    /// 제안서 공개 → 작성자
    async fn notify_author_proposal_vetted(
        &self,
        proposal: &ProposalRecord,
        author: &User,
        admin: &User,
    ) -> Result<()>;

    /// 제안서 공개 → 일반 사용자들
    async fn notify_users_proposal_vetted(
        &self,
        proposal: &ProposalRecord,
        author: &User,
        admin: &User,
    ) -> Result<()>;

    /// 제안서 검열 → 작성자
    async fn notify_author_proposal_censored(
        &self,
        proposal: &ProposalRecord,
        author: &User,
        admin: &User,
        reason: &str,
    ) -> Result<()>;

    /// 공개 제안서 수정 → 일반 사용자들
    async fn notify_users_proposal_edited(
        &self,
        proposal: &ProposalRecord,
        author: &User,
    ) -> Result<()>;

    /// 투표 시작 → 작성자 + 일반 사용자들
    async fn notify_users_vote_started(
        &self,
        proposal: &ProposalRecord,
        author: &User,
        admin: &User,
    ) -> Result<()>;

    /// 투표 승인 → 관리자들
    async fn notify_admins_vote_authorized(
        &self,
        proposal: &ProposalRecord,
        author: &User,
    ) -> Result<()>;
}

// ============================================================================
// AdminLog - 관리자 감사 로그
// ============================================================================

/// 관리자 액션 감사 로그
#[async_trait]
pub trait AdminLog: Send + Sync {
    /// 제안서에 대한 관리자 액션 기록
    async fn append_proposal_action(
        &self,
        admin: &User,
        token: &str,
        action: &str,
        reason: &str,
    ) -> Result<()>;

    /// 사용자에 대한 관리자 액션 기록
    async fn append_user_action(
        &self,
        admin: &User,
        target: &User,
        action: &str,
        reason: &str,
    ) -> Result<()>;
}
