//! 저장소 모듈.

pub mod sqlite;

pub use sqlite::SqliteStore;
