//! Event Manager - 버스 초기화와 핸들러 수명 관리
//!
//! 시작 시 한 번 버스를 만들고, 각 Reaction 루프를 시작한 뒤 endpoint를
//! 등록합니다. 메일이 설정되지 않았으면 이메일 핸들러는 아예 등록하지 않으므로
//! 해당 종류의 `fire`는 태스크를 만들지 않습니다.

use crate::handlers::{
    spawn_reaction, AuditProposalStatusChange, AuditUserManage, AuditVoteStarted,
    EmailProposalEdited, EmailProposalStatusChange, EmailProposalSubmitted,
    EmailProposalVoteAuthorized, EmailProposalVoteStarted, Reaction,
};
use politeia_foundation::{
    AdminLog, AdminLogFile, AuditBackend, Endpoint, EventBus, EventKind, EventPayload, Mailer,
    NotifyConfig, RecordStore, Result, SqliteAuditLog,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// ============================================================================
// Collaborators
// ============================================================================

/// 핸들러가 사용하는 외부 협력자
#[derive(Clone)]
pub struct Collaborators {
    pub records: Arc<dyn RecordStore>,
    /// 없으면 이메일 핸들러를 등록하지 않음
    pub mailer: Option<Arc<dyn Mailer>>,
    pub admin_log: Arc<dyn AdminLog>,
}

impl Collaborators {
    pub fn new(records: Arc<dyn RecordStore>, admin_log: Arc<dyn AdminLog>) -> Self {
        Self {
            records,
            mailer: None,
            admin_log,
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }
}

/// 설정된 백엔드로 감사 로그 생성
pub fn admin_log_from_config(config: &NotifyConfig) -> Result<Arc<dyn AdminLog>> {
    match config.audit_backend {
        AuditBackend::File => Ok(Arc::new(AdminLogFile::new(&config.admin_log_file))),
        AuditBackend::Sqlite => Ok(Arc::new(SqliteAuditLog::open(&config.audit_db_path)?)),
    }
}

/// 설정에 따라 등록할 Reaction 목록
///
/// 메일 미설정이거나 Mailer가 없으면 이메일 Reaction은 빠집니다.
pub fn build_reactions(config: &NotifyConfig, collaborators: &Collaborators) -> Vec<Arc<dyn Reaction>> {
    let log = &collaborators.admin_log;
    let records = &collaborators.records;

    let mailer = match (&collaborators.mailer, config.is_mail_configured()) {
        (Some(mailer), true) => Some(mailer.clone()),
        (None, true) => {
            warn!("Mail is configured but no mailer was provided; email handlers disabled");
            None
        }
        (_, false) => None,
    };

    let mut reactions: Vec<Arc<dyn Reaction>> = Vec::with_capacity(8);

    if let Some(mailer) = &mailer {
        reactions.push(Arc::new(EmailProposalSubmitted::new(mailer.clone())));
        reactions.push(Arc::new(EmailProposalStatusChange::new(mailer.clone(), records.clone())));
    }
    reactions.push(Arc::new(AuditProposalStatusChange::new(log.clone())));

    if let Some(mailer) = &mailer {
        reactions.push(Arc::new(EmailProposalEdited::new(mailer.clone(), records.clone())));
        reactions.push(Arc::new(EmailProposalVoteStarted::new(mailer.clone(), records.clone())));
    }
    reactions.push(Arc::new(AuditVoteStarted::new(log.clone())));

    if let Some(mailer) = &mailer {
        reactions.push(Arc::new(EmailProposalVoteAuthorized::new(mailer.clone(), records.clone())));
    }
    reactions.push(Arc::new(AuditUserManage::new(log.clone())));

    reactions
}

// ============================================================================
// EventManager
// ============================================================================

struct RunningHandler {
    name: &'static str,
    kind: EventKind,
    endpoint: Endpoint,
    task: JoinHandle<()>,
}

/// 이벤트 매니저
///
/// ## 사용법
///
/// ```ignore
/// let manager = EventManager::init(&config, collaborators);
///
/// // 상태 전이 완료 후
/// manager.publish(EventPayload::from(UserManage { .. }));
///
/// // 종료 시
/// manager.shutdown().await;
/// ```
pub struct EventManager {
    bus: Arc<EventBus>,
    handlers: Vec<RunningHandler>,
}

impl EventManager {
    /// 버스 생성 및 핸들러 연결 (Tokio 런타임 안에서 호출)
    pub fn init(config: &NotifyConfig, collaborators: Collaborators) -> Self {
        let bus = Arc::new(EventBus::with_config(config.bus.clone()));
        let reactions = build_reactions(config, &collaborators);

        let mut handlers = Vec::with_capacity(reactions.len());
        for reaction in reactions {
            let (endpoint, rx) = bus.endpoint();
            let name = reaction.name();
            let kind = reaction.kind();

            // 루프를 먼저 시작하고 등록
            let task = spawn_reaction(reaction, rx);
            bus.register(kind, endpoint.clone());

            debug!(handler = name, kind = %kind, endpoint = %endpoint.id(), "Handler registered");
            handlers.push(RunningHandler {
                name,
                kind,
                endpoint,
                task,
            });
        }

        info!(
            handlers = handlers.len(),
            mail = config.is_mail_configured(),
            "Event manager initialized"
        );

        Self { bus, handlers }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// 이벤트 발행 (전달 수 반환)
    pub fn fire(&self, kind: EventKind, payload: EventPayload) -> usize {
        self.bus.fire(kind, payload)
    }

    /// payload의 종류로 발행
    pub fn publish(&self, payload: EventPayload) -> usize {
        self.bus.publish(payload)
    }

    /// 등록된 핸들러 이름 (등록 순서)
    pub fn handler_names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name).collect()
    }

    /// 특정 종류에 등록된 핸들러 이름
    pub fn handlers_for(&self, kind: EventKind) -> Vec<&'static str> {
        self.handlers
            .iter()
            .filter(|h| h.kind == kind)
            .map(|h| h.name)
            .collect()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// 핸들러 하나 분리
    ///
    /// 버스에서 endpoint를 해제합니다. 이미 전달된 payload는 루프가 끝까지 처리합니다.
    pub fn detach(&mut self, name: &str) -> bool {
        let Some(pos) = self.handlers.iter().position(|h| h.name == name) else {
            return false;
        };

        let handler = self.handlers.remove(pos);
        let removed = self.bus.unregister(handler.kind, &handler.endpoint);
        debug!(handler = handler.name, removed, "Handler detached");
        removed
    }

    /// 종료
    ///
    /// 버스를 닫아 진행 중인 전달을 기다린 뒤, 각 핸들러 루프가 큐를 비우고
    /// 끝날 때까지 대기합니다.
    pub async fn shutdown(self) {
        let Self { bus, handlers } = self;
        bus.close().await;

        for handler in handlers {
            // endpoint 송신측이 남아 있으면 루프가 끝나지 않음
            drop(handler.endpoint);
            if let Err(e) = handler.task.await {
                warn!(handler = handler.name, error = %e, "Handler task ended abnormally");
            }
        }

        info!(fired = bus.fired_count(), "Event manager shut down");
    }
}

// ============================================================================
// 테스트
// ============================================================================
