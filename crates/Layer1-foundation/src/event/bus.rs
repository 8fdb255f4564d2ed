//! Event Bus - 이벤트 종류별 fan-out 디스패처
//!
//! 이벤트 종류마다 구독 endpoint 목록을 유지하고, `fire` 시 각 endpoint로
//! payload를 독립된 태스크에서 비동기로 전달합니다.
//!
//! - 발행자는 절대 블록되지 않습니다 (느린 핸들러가 요청을 지연시키지 않음)
//! - 서로 다른 endpoint 간의 전달 순서는 보장하지 않습니다
//! - 같은 endpoint라도 동시에 발행된 이벤트는 순서가 바뀔 수 있습니다
//! - 전달 확인은 없습니다 (best-effort, 메모리 내, 리스너당 최대 1회)

use super::types::{EventKind, EventPayload};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, trace, warn};

/// endpoint로 전달되는 payload (모든 구독자가 같은 스냅샷을 공유)
pub type Delivery = Arc<EventPayload>;

/// endpoint의 수신측
pub type EndpointReceiver = mpsc::Receiver<Delivery>;

// ============================================================================
// Endpoint
// ============================================================================

static ENDPOINT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// endpoint ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointId(u64);

impl EndpointId {
    fn next() -> Self {
        Self(ENDPOINT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "endpoint-{}", self.0)
    }
}

/// 핸들러의 단일 전달 지점 (송신측)
///
/// 동일성은 `EndpointId`로 판단합니다. 복제본은 같은 endpoint입니다.
#[derive(Debug, Clone)]
pub struct Endpoint {
    id: EndpointId,
    sender: mpsc::Sender<Delivery>,
}

impl Endpoint {
    pub fn id(&self) -> EndpointId {
        self.id
    }

    /// 수신측이 drop 되었는지
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Endpoint {}

/// 새 endpoint 쌍 생성
///
/// `capacity`는 최소 1로 보정됩니다.
pub fn endpoint(capacity: usize) -> (Endpoint, EndpointReceiver) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        Endpoint {
            id: EndpointId::next(),
            sender,
        },
        receiver,
    )
}

// ============================================================================
// EventBus
// ============================================================================

/// 이벤트 버스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBusConfig {
    /// endpoint 채널 용량
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// 이벤트 버스
///
/// 프로세스 전역 상태가 아니라, 시작 시 한 번 생성되어 명시적으로 주입되는 객체입니다.
///
/// ## 사용법
///
/// ```ignore
/// use politeia_foundation::event::{EventBus, EventKind};
///
/// let bus = EventBus::new();
///
/// // endpoint 생성 및 등록
/// let (endpoint, mut rx) = bus.endpoint();
/// bus.register(EventKind::UserManage, endpoint.clone());
///
/// // 이벤트 발행 (블록되지 않음)
/// bus.fire(EventKind::UserManage, payload);
///
/// // 수신
/// let delivery = rx.recv().await;
///
/// // 해제
/// bus.unregister(EventKind::UserManage, &endpoint);
/// ```
pub struct EventBus {
    /// 설정
    config: EventBusConfig,

    /// 종류별 구독 endpoint (등록 순서 유지)
    subscribers: RwLock<HashMap<EventKind, Vec<Endpoint>>>,

    /// 진행 중인 전달 태스크
    deliveries: TaskTracker,

    /// close 이후에는 발행을 받지 않음
    closed: AtomicBool,

    /// 전달 태스크를 만든 발행 수
    fired: AtomicU64,
}

impl EventBus {
    /// 기본 설정으로 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// 커스텀 설정으로 이벤트 버스 생성
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            config,
            subscribers: RwLock::new(HashMap::new()),
            deliveries: TaskTracker::new(),
            closed: AtomicBool::new(false),
            fired: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// 설정된 용량으로 endpoint 생성
    pub fn endpoint(&self) -> (Endpoint, EndpointReceiver) {
        endpoint(self.config.channel_capacity)
    }

    /// endpoint 등록
    ///
    /// 같은 endpoint를 두 번 등록하면 두 번 전달됩니다 (중복 방지는 호출자 책임).
    pub fn register(&self, kind: EventKind, endpoint: Endpoint) {
        let mut subscribers = self.subscribers.write();
        let list = subscribers.entry(kind).or_default();

        if list.contains(&endpoint) {
            warn!(
                kind = %kind,
                endpoint = %endpoint.id,
                "Endpoint registered twice; it will receive duplicate deliveries"
            );
        }

        debug!(kind = %kind, endpoint = %endpoint.id, "Registering endpoint");
        list.push(endpoint);
    }

    /// endpoint 해제
    ///
    /// 첫 번째로 일치하는 항목만 제거하며 나머지 순서는 유지합니다.
    /// 등록되지 않은 endpoint면 아무것도 하지 않습니다.
    pub fn unregister(&self, kind: EventKind, endpoint: &Endpoint) -> bool {
        let mut subscribers = self.subscribers.write();
        let Some(list) = subscribers.get_mut(&kind) else {
            return false;
        };

        let Some(pos) = list.iter().position(|e| e == endpoint) else {
            return false;
        };

        list.remove(pos);
        if list.is_empty() {
            subscribers.remove(&kind);
        }

        debug!(kind = %kind, endpoint = %endpoint.id, "Unregistered endpoint");
        true
    }

    /// 이벤트 발행
    ///
    /// 구독자마다 독립된 전달 태스크를 만들고 즉시 반환합니다.
    /// 만든 전달 태스크 수를 반환하며, 구독자가 없으면 태스크 없이 0을 반환합니다.
    /// 실패하지 않으며 느린 핸들러를 기다리지 않습니다.
    pub fn fire(&self, kind: EventKind, payload: EventPayload) -> usize {
        let subscribers = self.subscribers.read();

        if self.closed.load(Ordering::Acquire) {
            debug!(kind = %kind, "Event bus closed; dropping event");
            return 0;
        }

        let list = match subscribers.get(&kind) {
            Some(list) if !list.is_empty() => list,
            _ => {
                trace!(kind = %kind, "No subscribers");
                return 0;
            }
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(kind = %kind, error = %e, "Cannot fire event outside a Tokio runtime");
                return 0;
            }
        };

        let payload: Delivery = Arc::new(payload);
        let fired = self.fired.fetch_add(1, Ordering::Relaxed) + 1;

        trace!(
            kind = %kind,
            subject = %payload.subject(),
            subscribers = list.len(),
            "Firing event #{}", fired
        );

        for endpoint in list {
            let sender = endpoint.sender.clone();
            let id = endpoint.id;
            let payload = Arc::clone(&payload);

            self.deliveries.spawn_on(
                async move {
                    if sender.send(payload).await.is_err() {
                        debug!(kind = %kind, endpoint = %id, "Endpoint receiver dropped; delivery discarded");
                    }
                },
                &handle,
            );
        }

        list.len()
    }

    /// payload의 종류로 발행
    pub fn publish(&self, payload: EventPayload) -> usize {
        self.fire(payload.kind(), payload)
    }

    /// 특정 종류의 구독자 수
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.read().get(&kind).map_or(0, Vec::len)
    }

    /// 진행 중인 전달 태스크 수
    pub fn in_flight(&self) -> usize {
        self.deliveries.len()
    }

    /// 전달 태스크를 만든 총 발행 수
    pub fn fired_count(&self) -> u64 {
        self.fired.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// 버스 종료
    ///
    /// 1. 새 발행을 거부
    /// 2. 진행 중인 전달이 모두 끝날 때까지 대기
    /// 3. 모든 등록을 제거 → 핸들러 루프는 남은 큐를 비운 뒤 종료
    pub async fn close(&self) {
        {
            let _subscribers = self.subscribers.write();
            self.closed.store(true, Ordering::Release);
        }

        self.deliveries.close();
        self.deliveries.wait().await;

        let removed: usize = {
            let mut subscribers = self.subscribers.write();
            let count = subscribers.values().map(Vec::len).sum();
            subscribers.clear();
            count
        };

        debug!(endpoints = removed, "Event bus closed");
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 테스트
// ============================================================================
