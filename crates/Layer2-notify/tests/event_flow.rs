//! Event Flow 통합 테스트
//!
//! 발행 → 버스 → 핸들러 → 협력자까지 전체 경로를 검증합니다.
//! 모든 테스트는 검증 전에 `shutdown`으로 전달과 처리를 끝까지 기다립니다.

mod common;

use common::{mail_config, Harness};
use politeia_foundation::event::{
    ProposalEdited, ProposalStatusChange, ProposalSubmitted, ProposalVoteAuthorized,
    ProposalVoteStarted, UserManage,
};
use politeia_foundation::{
    AdminLogFile, AuthorizeVote, AuthorizeVoteAction, EventKind, EventPayload, ManageUser,
    NotifyConfig, ProposalRecord, ProposalStatus, SetProposalStatus, StartVote, User,
    UserManageAction, Vote,
};
use politeia_notify::{Collaborators, EventManager};
use std::sync::Arc;

fn status_change(h: &Harness, status: ProposalStatus, message: &str) -> EventPayload {
    EventPayload::from(ProposalStatusChange {
        proposal: h.proposal.clone(),
        set_proposal_status: SetProposalStatus {
            token: "abc123".to_string(),
            status,
            message: message.to_string(),
        },
        admin_user: h.admin.clone(),
    })
}

fn user_manage(h: &Harness, action: UserManageAction, reason: &str) -> EventPayload {
    EventPayload::from(UserManage {
        admin_user: h.admin.clone(),
        user: h.reader.clone(),
        manage_user: ManageUser {
            user_id: h.reader.id,
            action,
            reason: reason.to_string(),
        },
    })
}

#[tokio::test]
async fn test_censored_status_change_reaches_both_handlers() {
    let h = Harness::new().await;
    let manager = EventManager::init(&mail_config(), h.collaborators.clone());

    let delivered = manager.fire(
        EventKind::ProposalStatusChange,
        status_change(&h, ProposalStatus::Censored, "spam"),
    );
    assert_eq!(delivered, 2);
    manager.shutdown().await;

    assert_eq!(
        h.log.entries(),
        vec![(
            "alice".to_string(),
            "abc123".to_string(),
            "set proposal status to censored".to_string(),
            "spam".to_string()
        )]
    );

    let sent = h.outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Your Proposal Has Been Censored");
    assert_eq!(sent[0].recipients, vec![h.author.email.clone()]);
    assert!(sent[0].body.contains("Reason: spam"));
}

#[tokio::test]
async fn test_public_status_change_mails_author_and_users() {
    let h = Harness::new().await;
    let manager = EventManager::init(&mail_config(), h.collaborators.clone());

    manager.publish(status_change(&h, ProposalStatus::Public, ""));
    manager.shutdown().await;

    assert_eq!(
        h.subjects(),
        vec!["Your Proposal Has Been Published", "New Proposal Published"]
    );
    // 일반 사용자 알림은 작성자와 관리자를 제외
    assert_eq!(h.outbox.sent()[1].recipients, vec![h.reader.email.clone()]);
    assert_eq!(h.log.entries().len(), 1);
}

#[tokio::test]
async fn test_other_status_logs_without_mail() {
    let h = Harness::new().await;
    let manager = EventManager::init(&mail_config(), h.collaborators.clone());

    manager.publish(status_change(&h, ProposalStatus::Abandoned, "author left"));
    manager.shutdown().await;

    assert!(h.outbox.is_empty());
    let entries = h.log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].2, "set proposal status to abandoned");
}

#[tokio::test]
async fn test_user_manage_only_audits() {
    let h = Harness::new().await;
    let manager = EventManager::init(&mail_config(), h.collaborators.clone());

    assert_eq!(manager.handlers_for(EventKind::UserManage), vec!["audit_user_manage"]);
    manager.publish(user_manage(&h, UserManageAction::Lock, "policy violation"));
    manager.shutdown().await;

    assert!(h.outbox.is_empty());
    assert_eq!(
        h.log.entries(),
        vec![(
            "alice".to_string(),
            "carol".to_string(),
            "lock".to_string(),
            "policy violation".to_string()
        )]
    );
}

#[tokio::test]
async fn test_mail_unconfigured_skips_email_handlers() {
    let h = Harness::new().await;
    let manager = EventManager::init(&NotifyConfig::new(), h.collaborators.clone());

    let delivered = manager.publish(EventPayload::from(ProposalSubmitted {
        censorship_record: h.proposal.censorship_record.clone(),
        proposal_name: h.proposal.name.clone(),
        user: h.author.clone(),
    }));
    assert_eq!(delivered, 0);
    assert_eq!(manager.bus().in_flight(), 0);

    assert_eq!(manager.publish(status_change(&h, ProposalStatus::Censored, "spam")), 1);
    manager.shutdown().await;

    assert!(h.outbox.is_empty());
    assert_eq!(h.log.entries().len(), 1);
}

#[tokio::test]
async fn test_submitted_edited_and_vote_flow() {
    let h = Harness::new().await;
    let manager = EventManager::init(&mail_config(), h.collaborators.clone());

    manager.publish(EventPayload::from(ProposalSubmitted {
        censorship_record: h.proposal.censorship_record.clone(),
        proposal_name: h.proposal.name.clone(),
        user: h.author.clone(),
    }));

    let mut edited = h.proposal.clone();
    edited.status = ProposalStatus::Public;
    edited.version = "2".to_string();
    manager.publish(EventPayload::from(ProposalEdited { proposal: edited }));

    manager.publish(EventPayload::from(ProposalVoteAuthorized {
        authorize_vote: AuthorizeVote {
            token: "abc123".to_string(),
            action: AuthorizeVoteAction::Authorize,
            public_key: "pk-bob".to_string(),
            signature: String::new(),
        },
        user: h.author.clone(),
    }));

    manager.publish(EventPayload::from(ProposalVoteStarted {
        admin_user: h.admin.clone(),
        start_vote: StartVote {
            public_key: String::new(),
            vote: Vote::yes_no("abc123", 2016),
            signature: String::new(),
        },
    }));

    manager.shutdown().await;

    // 핸들러 간 순서는 보장되지 않음
    let mut subjects = h.subjects();
    subjects.sort();
    assert_eq!(
        subjects,
        vec![
            "New Proposal Submitted",
            "Proposal Authorized To Start Voting",
            "Proposal Edited",
            "Voting Started for Proposal",
            "Voting Started for Your Proposal",
        ]
    );

    assert_eq!(
        h.log.entries(),
        vec![(
            "alice".to_string(),
            "abc123".to_string(),
            "start vote".to_string(),
            String::new()
        )]
    );
}

#[tokio::test]
async fn test_wrong_variant_does_not_stop_handler() {
    let h = Harness::new().await;
    let manager = EventManager::init(&mail_config(), h.collaborators.clone());

    // UserManage 종류로 잘못된 payload를 발행
    let delivered = manager.fire(
        EventKind::UserManage,
        status_change(&h, ProposalStatus::Censored, "spam"),
    );
    assert_eq!(delivered, 1);

    // 이후의 정상 payload는 계속 처리됨
    manager.publish(user_manage(&h, UserManageAction::Unlock, "appeal accepted"));
    manager.shutdown().await;

    assert_eq!(
        h.log.entries(),
        vec![(
            "alice".to_string(),
            "carol".to_string(),
            "unlock".to_string(),
            "appeal accepted".to_string()
        )]
    );
}

#[tokio::test]
async fn test_lookup_failure_is_isolated() {
    let h = Harness::new().await;
    let manager = EventManager::init(&mail_config(), h.collaborators.clone());

    // 작성자를 찾을 수 없는 제안서
    let orphan = ProposalRecord::new("Orphan", "def456", ProposalStatus::Public)
        .with_public_key("pk-unknown");
    manager.publish(EventPayload::from(ProposalEdited { proposal: orphan }));

    let mut edited = h.proposal.clone();
    edited.status = ProposalStatus::Public;
    manager.publish(EventPayload::from(ProposalEdited { proposal: edited }));
    manager.shutdown().await;

    assert_eq!(h.subjects(), vec!["Proposal Edited"]);
}

#[tokio::test]
async fn test_detached_handler_receives_nothing() {
    let h = Harness::new().await;
    let mut manager = EventManager::init(&mail_config(), h.collaborators.clone());

    assert!(manager.detach("email_proposal_status_change"));
    assert_eq!(manager.bus().subscriber_count(EventKind::ProposalStatusChange), 1);

    manager.publish(status_change(&h, ProposalStatus::Censored, "spam"));
    manager.shutdown().await;

    assert!(h.outbox.is_empty());
    assert_eq!(h.log.entries().len(), 1);
}

#[tokio::test]
async fn test_admin_log_file_end_to_end() {
    let h = Harness::new().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("admin.log");

    let collaborators = Collaborators::new(
        h.collaborators.records.clone(),
        Arc::new(AdminLogFile::new(&path)),
    );
    let manager = EventManager::init(&NotifyConfig::new(), collaborators);

    manager.publish(status_change(&h, ProposalStatus::Censored, "spam"));
    manager.publish(user_manage(&h, UserManageAction::Lock, "policy violation"));
    manager.shutdown().await;

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines: Vec<&str> = content.lines().collect();
    lines.sort_by_key(|l| l.contains(",lock,"));

    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(&format!(
        "{},alice,set proposal status to censored,abc123,spam",
        h.admin.id
    )));
    assert!(lines[1].ends_with(&format!(
        "{},alice,lock,{},carol,policy violation",
        h.admin.id, h.reader.id
    )));
}

#[tokio::test]
async fn test_fire_after_shutdown_is_dropped() {
    let h = Harness::new().await;
    let manager = EventManager::init(&mail_config(), h.collaborators.clone());
    let bus = manager.bus().clone();

    manager.shutdown().await;

    let outsider = User::new("dave", "dave@example.com");
    let payload = EventPayload::from(UserManage {
        admin_user: h.admin.clone(),
        user: outsider.clone(),
        manage_user: ManageUser {
            user_id: outsider.id,
            action: UserManageAction::Deactivate,
            reason: String::new(),
        },
    });

    assert_eq!(bus.publish(payload), 0);
    assert!(h.log.entries().is_empty());
}
