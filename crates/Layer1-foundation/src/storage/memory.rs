//! In-memory record store
//!
//! 사용자, 공개키 → 사용자 인덱스, 제안서 인벤토리를 메모리에 보관합니다.
//! 조회마다 읽기 잠금을 잡고 풀며, 복사본을 반환하므로 잠금이 부수효과 호출에
//! 걸쳐 유지되지 않습니다.

use crate::core::{ProposalRecord, RecordStore, User, UserId};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// 파일에서 읽는 초기 레코드 묶음
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFixture {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub proposals: Vec<ProposalRecord>,
}

impl RecordFixture {
    /// JSON 파일에서 로드
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[derive(Default)]
struct Records {
    users: HashMap<UserId, User>,
    public_keys: HashMap<String, UserId>,
    inventory: HashMap<String, ProposalRecord>,
}

/// 인메모리 RecordStore
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Records>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// fixture로 초기화
    pub async fn from_fixture(fixture: RecordFixture) -> Self {
        let store = Self::new();
        for user in fixture.users {
            store.insert_user(user).await;
        }
        for proposal in fixture.proposals {
            store.insert_proposal(proposal).await;
        }
        store
    }

    /// 사용자 추가 (공개키 인덱스 갱신)
    pub async fn insert_user(&self, user: User) {
        let mut records = self.records.write().await;
        for key in &user.public_keys {
            records.public_keys.insert(key.clone(), user.id);
        }
        records.users.insert(user.id, user);
    }

    /// 제안서 추가/교체
    pub async fn insert_proposal(&self, proposal: ProposalRecord) {
        let mut records = self.records.write().await;
        records
            .inventory
            .insert(proposal.token().to_string(), proposal);
    }

    pub async fn user_count(&self) -> usize {
        self.records.read().await.users.len()
    }

    pub async fn proposal_count(&self) -> usize {
        self.records.read().await.inventory.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn user_by_id(&self, id: &UserId) -> Result<User> {
        let records = self.records.read().await;
        records
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("user {}", id)))
    }

    async fn user_id_by_public_key(&self, public_key: &str) -> Result<UserId> {
        let records = self.records.read().await;
        records
            .public_keys
            .get(public_key)
            .copied()
            .ok_or_else(|| Error::not_found(format!("user with public key {:?}", public_key)))
    }

    async fn proposal_by_token(&self, token: &str) -> Result<ProposalRecord> {
        let records = self.records.read().await;
        records
            .inventory
            .get(token)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("proposal {}", token)))
    }

    async fn users(&self) -> Result<Vec<User>> {
        let records = self.records.read().await;
        let mut users: Vec<User> = records.users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}

// ============================================================================
// 테스트
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProposalStatus;

    #[tokio::test]
    async fn test_lookups() {
        let author = User::new("alice", "alice@example.com").with_public_key("pk-alice");
        let store = InMemoryRecordStore::new();
        store.insert_user(author.clone()).await;
        store
            .insert_proposal(ProposalRecord::new("P", "abc123", ProposalStatus::Public))
            .await;

        assert_eq!(store.user_by_id(&author.id).await.unwrap(), author);
        assert_eq!(store.user_id_by_public_key("pk-alice").await.unwrap(), author.id);
        assert_eq!(store.proposal_by_token("abc123").await.unwrap().name, "P");

        assert!(store.proposal_by_token("missing").await.unwrap_err().is_lookup());
        assert!(store.user_id_by_public_key("pk-x").await.unwrap_err().is_lookup());
    }

    #[tokio::test]
    async fn test_proposal_author_resolution() {
        let author = User::new("alice", "alice@example.com").with_public_key("pk-alice");
        let store = InMemoryRecordStore::new();
        store.insert_user(author.clone()).await;

        // user_id가 있으면 바로 조회
        let by_id = ProposalRecord::new("P", "t1", ProposalStatus::Public).with_author(&author);
        assert_eq!(store.proposal_author(&by_id).await.unwrap().id, author.id);

        // user_id가 비어 있으면 공개키로 조회
        let by_key =
            ProposalRecord::new("P", "t2", ProposalStatus::Public).with_public_key("pk-alice");
        assert_eq!(store.proposal_author(&by_key).await.unwrap().id, author.id);

        // 잘못된 UUID
        let mut bad = by_id.clone();
        bad.user_id = "not-a-uuid".into();
        assert!(store.proposal_author(&bad).await.unwrap_err().is_lookup());
    }

    #[tokio::test]
    async fn test_fixture_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");

        let fixture = RecordFixture {
            users: vec![User::new("bob", "bob@example.com")],
            proposals: vec![ProposalRecord::new("P", "t1", ProposalStatus::NotReviewed)],
        };
        std::fs::write(&path, serde_json::to_string(&fixture).unwrap()).unwrap();

        let store = InMemoryRecordStore::from_fixture(RecordFixture::load(&path).unwrap()).await;
        assert_eq!(store.user_count().await, 1);
        assert_eq!(store.proposal_count().await, 1);
    }
}
