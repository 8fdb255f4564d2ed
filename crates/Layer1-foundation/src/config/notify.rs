//! Notify Config - 이벤트 디스패처 설정
//!
//! 메일 발송 여부, 관리자 로그 위치, 이벤트 버스 설정을 관리합니다.

use crate::event::EventBusConfig;
use crate::storage::JsonStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 설정 파일명
pub const NOTIFY_CONFIG_FILE: &str = "notify.json";

// ============================================================================
// Notify Config (통합)
// ============================================================================

/// 이벤트 디스패처 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyConfig {
    /// SMTP 설정 (없으면 이메일 핸들러를 등록하지 않음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smtp: Option<SmtpConfig>,

    /// 관리자 로그 파일 경로
    #[serde(default = "default_admin_log_file")]
    pub admin_log_file: PathBuf,

    /// 감사 로그 백엔드
    #[serde(default)]
    pub audit_backend: AuditBackend,

    /// SQLite 감사 로그 경로 (`auditBackend = sqlite`)
    #[serde(default = "default_audit_db_path")]
    pub audit_db_path: PathBuf,

    /// 이메일 링크에 쓰는 웹 서버 주소
    #[serde(default = "default_web_server_address")]
    pub web_server_address: String,

    /// 이벤트 버스 설정
    #[serde(default)]
    pub bus: EventBusConfig,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            smtp: None,
            admin_log_file: default_admin_log_file(),
            audit_backend: AuditBackend::default(),
            audit_db_path: default_audit_db_path(),
            web_server_address: default_web_server_address(),
            bus: EventBusConfig::default(),
        }
    }
}

impl NotifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 메일 발송이 설정되었는지 (초기화 시 한 번만 확인)
    pub fn is_mail_configured(&self) -> bool {
        self.smtp.is_some()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<NotifyConfig>(NOTIFY_CONFIG_FILE)? {
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        if let Ok(project) = JsonStore::current_project() {
            if let Some(project_config) =
                project.load_optional::<NotifyConfig>(NOTIFY_CONFIG_FILE)?
            {
                config.merge(project_config);
            }
        }

        Ok(config)
    }

    /// 지정한 파일에서 로드 (`.toml` 또는 JSON)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: NotifyConfig) {
        if other.smtp.is_some() {
            self.smtp = other.smtp;
        }
        if other.admin_log_file != default_admin_log_file() {
            self.admin_log_file = other.admin_log_file;
        }
        if other.audit_backend != AuditBackend::default() {
            self.audit_backend = other.audit_backend;
        }
        if other.audit_db_path != default_audit_db_path() {
            self.audit_db_path = other.audit_db_path;
        }
        if other.web_server_address != default_web_server_address() {
            self.web_server_address = other.web_server_address;
        }
        if other.bus.channel_capacity != EventBusConfig::default().channel_capacity {
            self.bus = other.bus;
        }
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn smtp(mut self, smtp: SmtpConfig) -> Self {
        self.smtp = Some(smtp);
        self
    }

    pub fn admin_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.admin_log_file = path.into();
        self
    }

    pub fn web_server_address(mut self, address: impl Into<String>) -> Self {
        self.web_server_address = address.into();
        self
    }
}

// ============================================================================
// SMTP Config
// ============================================================================

/// SMTP 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmtpConfig {
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// 발신 주소
    pub from_address: String,
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_smtp_port(),
            username: None,
            from_address: from_address.into(),
        }
    }
}

// ============================================================================
// Audit Backend
// ============================================================================

/// 감사 로그 백엔드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditBackend {
    /// 추가 전용 텍스트 파일
    #[default]
    File,
    /// SQLite 데이터베이스
    Sqlite,
}

// ============================================================================
// 기본값
// ============================================================================

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("politeia")
}

fn default_admin_log_file() -> PathBuf {
    data_dir().join("admin.log")
}

fn default_audit_db_path() -> PathBuf {
    data_dir().join("admin.db")
}

fn default_web_server_address() -> String {
    "https://127.0.0.1:4443".to_string()
}

fn default_smtp_port() -> u16 {
    587
}
