//! Seed data for the in-memory store
//!
//! ```json
//! {
//!   "rooms": [
//!     {
//!       "id": "6f1c1c9e-8f43-4a55-9a53-7a3c0d2f4b10",
//!       "name": "lobby",
//!       "members": [
//!         { "id": "0b6a7f0e-2c1d-4e55-8b7a-1f2e3d4c5b6a", "username": "alice" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub rooms: Vec<SeedRoom>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRoom {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub members: Vec<SeedMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedMember {
    pub id: Uuid,
    pub username: String,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_json() {
        // テスト項目: ルームとメンバーを含む JSON をパースできる
        // given (前提条件):
        let json = r#"{
            "rooms": [{
                "id": "6f1c1c9e-8f43-4a55-9a53-7a3c0d2f4b10",
                "name": "lobby",
                "members": [
                    { "id": "0b6a7f0e-2c1d-4e55-8b7a-1f2e3d4c5b6a", "username": "alice" }
                ]
            }]
        }"#;

        // when (操作):
        let seed = SeedData::from_json(json).unwrap();

        // then (期待する結果):
        assert_eq!(seed.rooms.len(), 1);
        assert_eq!(seed.rooms[0].name, "lobby");
        assert_eq!(seed.rooms[0].members[0].username, "alice");
    }

    #[test]
    fn test_members_default_to_empty() {
        // テスト項目: members を省略したルームはメンバーなしになる
        // given (前提条件):
        let json = r#"{ "rooms": [{ "id": "6f1c1c9e-8f43-4a55-9a53-7a3c0d2f4b10", "name": "empty" }] }"#;

        // when (操作):
        let seed = SeedData::from_json(json).unwrap();

        // then (期待する結果):
        assert!(seed.rooms[0].members.is_empty());
    }

    #[test]
    fn test_invalid_uuid_is_rejected() {
        // テスト項目: 不正な UUID を含む JSON はパースエラーになる
        // given (前提条件):
        let json = r#"{ "rooms": [{ "id": "not-a-uuid", "name": "lobby" }] }"#;

        // when (操作):
        let result = SeedData::from_json(json);

        // then (期待する結果):
        assert!(matches!(result, Err(SeedError::Parse(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        // テスト項目: 存在しないファイルを指定するとパス付きのエラーになる
        // given (前提条件):
        let path = "/nonexistent/parlor-seed.json";

        // when (操作):
        let result = SeedData::from_file(path);

        // then (期待する結果):
        match result {
            Err(SeedError::Read { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
