//! Domain identifiers (strongly-typed IDs).
//!
//! # 3 種類の ID
//! - **ObjectId / DocumentId**: ドキュメントストア由来の 12 byte ID（24 桁の hex 表記）
//! - **WorkspaceId / UserId**: 呼び出し側から渡される文字列 ID（空白のみは不可）
//! - **JobId**: restyle ジョブの ID（ULID、`job-` プレフィックス付きで表示）
//!
//! ## Phantom Type パターン
//! ULID 系の ID は `Id<T>` で共通実装を持ち、`T` はマーカー型としてのみ使います。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// Length of an object id in bytes.
pub const OBJECT_ID_LEN: usize = 12;

/// Identifier parse failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("expected {expected} hex characters, got {0}", expected = OBJECT_ID_LEN * 2)]
    Length(usize),

    #[error("non-hex character in {0:?}")]
    NotHex(String),

    #[error("identifier is blank")]
    Blank,

    #[error("malformed job id {0:?}")]
    Job(String),
}

// ========================================
// ObjectId
// ========================================

/// 12 byte の object id。
///
/// 先頭 4 byte が秒単位のタイムスタンプ、残り 8 byte がランダム部分。
/// 表記は小文字 hex 24 桁で、パース時は大文字も受け付けます。
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

/// Documents are addressed by object id.
pub type DocumentId = ObjectId;

impl ObjectId {
    /// Build an id from a timestamp (seconds) and 8 random bytes.
    pub fn from_parts(timestamp_secs: u32, tail: [u8; 8]) -> Self {
        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes[..4].copy_from_slice(&timestamp_secs.to_be_bytes());
        bytes[4..].copy_from_slice(&tail);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_LEN] {
        &self.0
    }

    pub fn timestamp_secs(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

impl FromStr for ObjectId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != OBJECT_ID_LEN * 2 {
            return Err(IdParseError::Length(s.len()));
        }
        let mut bytes = [0u8; OBJECT_ID_LEN];
        for (slot, pair) in bytes.iter_mut().zip(s.as_bytes().chunks_exact(2)) {
            match (hex_value(pair[0]), hex_value(pair[1])) {
                (Some(hi), Some(lo)) => *slot = (hi << 4) | lo,
                _ => return Err(IdParseError::NotHex(s.to_owned())),
            }
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({self})")
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ========================================
// 文字列 ID
// ========================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Trim and reject blank input.
            pub fn parse(raw: &str) -> Result<Self, IdParseError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(IdParseError::Blank);
                }
                Ok(Self(trimmed.to_owned()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a workspace (container of documents and connections).
    WorkspaceId
);

string_id!(
    /// Identifier of the caller; trusted as supplied.
    UserId
);

impl From<ObjectId> for WorkspaceId {
    fn from(id: ObjectId) -> Self {
        Self(id.to_string())
    }
}

// ========================================
// ULID 系 ID
// ========================================

/// IdMarker は各 ULID 系 ID 型のマーカー trait
pub trait IdMarker: Send + Sync + 'static {
    /// Display で使うプレフィックス（例: "job-"）
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData で、実行時にはメモリを消費しません。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// `job-01H...` と裸の ULID の両方を受け付ける
impl<T: IdMarker> FromStr for Id<T> {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let body = raw.strip_prefix(T::prefix()).unwrap_or(raw);
        Ulid::from_string(body)
            .map(Self::from_ulid)
            .map_err(|_| IdParseError::Job(s.to_owned()))
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Job のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Job {}

impl IdMarker for Job {
    fn prefix() -> &'static str {
        "job-"
    }
}

/// Identifier of a workspace restyle job.
pub type JobId = Id<Job>;
