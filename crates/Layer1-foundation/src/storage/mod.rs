//! Storage module
//!
//! - `json`: JSON - 설정/fixture 파일 저장/로드
//! - `memory`: 인메모리 레코드 저장소 (사용자, 공개키 인덱스, 제안서 인벤토리)

mod json;
mod memory;

// JSON Storage (범용)
pub use json::JsonStore;

// In-memory RecordStore
pub use memory::{InMemoryRecordStore, RecordFixture};
