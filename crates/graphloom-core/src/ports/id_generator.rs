//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: JobId は ULID、WorkspaceId は object id（どちらも Clock ベース）

use crate::domain::ids::{JobId, ObjectId, WorkspaceId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は分散環境で調整なしに使える ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（バックグラウンドタスクからも使う）
pub trait IdGenerator: Send + Sync {
    /// Job ID を生成
    fn generate_job_id(&self) -> JobId;

    /// Workspace ID を生成（24 桁 hex）
    fn generate_workspace_id(&self) -> WorkspaceId;
}

/// UlidGenerator は Clock を使って時刻ベースの ID を生成します。
/// テスト時は FixedClock を渡すと timestamp 部分が決定的になります。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_job_id(&self) -> JobId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        JobId::from(ulid)
    }

    fn generate_workspace_id(&self) -> WorkspaceId {
        let timestamp_secs = self.clock.now().timestamp() as u32;
        WorkspaceId::from(ObjectId::from_parts(timestamp_secs, rand::random()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let id1 = id_gen.generate_job_id();
        let id2 = id_gen.generate_job_id();

        assert_ne!(id1, id2);
        assert!(id1.to_string().starts_with("job-"));
    }

    #[test]
    fn ulid_generator_with_fixed_clock_is_deterministic() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.generate_job_id();
        let id2 = id_gen.generate_job_id();

        // ランダム部分があるので ID は異なるが、timestamp 部分は同じ
        assert_ne!(id1, id2);
        assert_eq!(id1.as_ulid().timestamp_ms(), fixed_time.timestamp_millis() as u64);
        assert_eq!(id2.as_ulid().timestamp_ms(), fixed_time.timestamp_millis() as u64);
    }

    #[test]
    fn workspace_ids_are_object_ids() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let ws = id_gen.generate_workspace_id();
        let parsed: ObjectId = ws.as_str().parse().unwrap();
        assert_eq!(parsed.timestamp_secs() as i64, fixed_time.timestamp());
    }
}
