//! Replay mode - 이벤트 파일을 버스로 재생

use politeia_foundation::{
    AdminLogFile, EventKind, EventPayload, InMemoryRecordStore, NotifyConfig, RecordFixture,
};
use politeia_notify::{
    admin_log_from_config, build_reactions, Collaborators, EmailNotifier, EventManager,
    LogTransport,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 재생 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub deliveries: usize,
    pub handlers: usize,
}

/// 이벤트 파일 로드 (JSON 배열)
pub fn load_events(path: &Path) -> anyhow::Result<Vec<EventPayload>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}

async fn record_store(fixture: Option<&Path>) -> anyhow::Result<Arc<InMemoryRecordStore>> {
    let store = match fixture {
        Some(path) => InMemoryRecordStore::from_fixture(RecordFixture::load(path)?).await,
        None => InMemoryRecordStore::new(),
    };
    Ok(Arc::new(store))
}

/// 이벤트를 모두 발행하고 핸들러가 끝날 때까지 대기
pub async fn run(
    config: &NotifyConfig,
    events: &Path,
    fixture: Option<&Path>,
) -> anyhow::Result<ReplaySummary> {
    let payloads = load_events(events)?;
    let records = record_store(fixture).await?;
    let admin_log = admin_log_from_config(config)?;

    let mailer = EmailNotifier::new(
        Arc::new(LogTransport),
        records.clone(),
        config.web_server_address.clone(),
    );
    let collaborators = Collaborators::new(records, admin_log).with_mailer(Arc::new(mailer));

    let manager = EventManager::init(config, collaborators);
    let handlers = manager.handler_count();

    let mut deliveries = 0;
    for payload in payloads.iter().cloned() {
        let kind = payload.kind();
        let subject = payload.subject();
        let delivered = manager.publish(payload);
        info!(kind = %kind, subject = %subject, delivered, "Published");
        deliveries += delivered;
    }

    manager.shutdown().await;

    Ok(ReplaySummary {
        events: payloads.len(),
        deliveries,
        handlers,
    })
}

/// 종류별로 등록될 핸들러 출력
pub fn print_kinds(config: &NotifyConfig) {
    for (kind, handlers) in kind_table(config) {
        let list = if handlers.is_empty() {
            "(none)".to_string()
        } else {
            handlers.join(", ")
        };
        println!("{:<26} {}", kind.as_str(), list);
    }
}

/// 현재 설정에서 종류별 핸들러 이름
pub fn kind_table(config: &NotifyConfig) -> Vec<(EventKind, Vec<&'static str>)> {
    let records = Arc::new(InMemoryRecordStore::new());
    let mailer = EmailNotifier::new(
        Arc::new(LogTransport),
        records.clone(),
        config.web_server_address.clone(),
    );
    // 파일은 첫 기록 때 생성되므로 여기서는 만들어지지 않음
    let collaborators = Collaborators::new(records, Arc::new(AdminLogFile::new(&config.admin_log_file)))
        .with_mailer(Arc::new(mailer));
    let reactions = build_reactions(config, &collaborators);

    EventKind::ALL
        .iter()
        .map(|&kind| {
            let names = reactions
                .iter()
                .filter(|r| r.kind() == kind)
                .map(|r| r.name())
                .collect();
            (kind, names)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use politeia_foundation::SmtpConfig;

    const EVENTS: &str = r#"[
        {
            "kind": "user_manage",
            "adminUser": {
                "id": "6f1d2a5e-0f3c-4c1e-9d2b-0c4a1b2c3d4e",
                "username": "alice",
                "email": "alice@example.com",
                "admin": true
            },
            "user": {
                "id": "0b8e7c6d-5a4f-4e3d-8c2b-1a0f9e8d7c6b",
                "username": "carol",
                "email": "carol@example.com"
            },
            "manageUser": {
                "userId": "0b8e7c6d-5a4f-4e3d-8c2b-1a0f9e8d7c6b",
                "action": "lock",
                "reason": "policy violation"
            }
        }
    ]"#;

    #[test]
    fn test_kind_table_without_mail() {
        let table = kind_table(&NotifyConfig::new());

        assert_eq!(table.len(), EventKind::ALL.len());
        let submitted = &table[0];
        assert_eq!(submitted.0, EventKind::ProposalSubmitted);
        assert!(submitted.1.is_empty());
    }

    #[test]
    fn test_kind_table_with_mail() {
        let config =
            NotifyConfig::new().smtp(SmtpConfig::new("smtp.example.com", "noreply@example.com"));
        let table = kind_table(&config);

        let status = table
            .iter()
            .find(|(kind, _)| *kind == EventKind::ProposalStatusChange)
            .unwrap();
        assert_eq!(
            status.1,
            vec!["email_proposal_status_change", "audit_proposal_status_change"]
        );
    }

    #[tokio::test]
    async fn test_replay_writes_admin_log() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events.json");
        let log = dir.path().join("admin.log");
        std::fs::write(&events, EVENTS).unwrap();

        let config = NotifyConfig::new().admin_log_file(&log);
        let summary = run(&config, &events, None).await.unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                events: 1,
                deliveries: 1,
                handlers: 3
            }
        );

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(content
            .trim_end()
            .ends_with("alice,lock,0b8e7c6d-5a4f-4e3d-8c2b-1a0f9e8d7c6b,carol,policy violation"));
    }

    #[test]
    fn test_load_events_rejects_unknown_kind() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events.json");
        std::fs::write(&events, r#"[{"kind": "proposal_vote_finished"}]"#).unwrap();

        assert!(load_events(&events).is_err());
    }
}
