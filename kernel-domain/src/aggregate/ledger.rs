use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain_event::EventPosition;
use crate::error::DomainResult;
use crate::value_object::Version;

/// 已记录但尚未交付持久化的事件
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent<E> {
    event_id: Uuid,
    position: EventPosition,
    occurred_at: DateTime<Utc>,
    payload: E,
}

impl<E> RecordedEvent<E> {
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn position(&self) -> EventPosition {
        self.position
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub(crate) fn into_parts(self) -> (Uuid, EventPosition, DateTime<Utc>, E) {
        (self.event_id, self.position, self.occurred_at, self.payload)
    }
}

/// 事件账本：聚合的版本号与只追加的未提交事件日志
///
/// 只有聚合根自身的 `mutate` 能追加事件，只有 `pull_uncommitted_events` 能清空日志；
/// 对外仅暴露只读视图。
#[derive(Debug, Clone, PartialEq)]
pub struct EventLedger<E> {
    version: Version,
    uncommitted: Vec<RecordedEvent<E>>,
}

impl<E> Default for EventLedger<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventLedger<E> {
    /// 全新聚合：版本 0，日志为空
    pub fn new() -> Self {
        Self::rehydrated(Version::new())
    }

    /// 从持久化状态恢复：日志为空，版本为已持久化的版本
    pub fn rehydrated(version: Version) -> Self {
        Self {
            version,
            uncommitted: Vec::new(),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn uncommitted(&self) -> &[RecordedEvent<E>] {
        &self.uncommitted
    }

    pub fn has_uncommitted(&self) -> bool {
        !self.uncommitted.is_empty()
    }

    /// 记录一个成功的变更批次：版本恰好加一，事件按产生顺序编号（从 1 开始）
    ///
    /// 版本号耗尽时返回错误，账本保持不变。
    pub(crate) fn record(&mut self, events: Vec<E>) -> DomainResult<Version> {
        let version = self.version.next()?;
        let occurred_at = Utc::now();
        self.uncommitted
            .extend(events.into_iter().enumerate().map(|(offset, payload)| RecordedEvent {
                event_id: Uuid::now_v7(),
                position: EventPosition::new(version, offset + 1),
                occurred_at,
                payload,
            }));
        self.version = version;
        Ok(version)
    }

    pub(crate) fn drain(&mut self) -> Vec<RecordedEvent<E>> {
        std::mem::take(&mut self.uncommitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_bumps_version_once_per_batch() {
        let mut ledger = EventLedger::<&str>::new();
        let v1 = ledger.record(vec!["a", "b"]).unwrap();
        let v2 = ledger.record(vec![]).unwrap();
        assert_eq!(v1, Version::from_value(1));
        assert_eq!(v2, Version::from_value(2));
        assert_eq!(ledger.version(), v2);

        let positions: Vec<_> = ledger.uncommitted().iter().map(|e| e.position()).collect();
        assert_eq!(
            positions,
            vec![EventPosition::new(v1, 1), EventPosition::new(v1, 2)]
        );
    }

    #[test]
    fn drain_empties_log_but_keeps_version() {
        let mut ledger = EventLedger::rehydrated(Version::from_value(7));
        ledger.record(vec![1u8]).unwrap();
        assert!(ledger.has_uncommitted());

        let drained = ledger.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(*drained[0].payload(), 1);
        assert!(ledger.drain().is_empty());
        assert_eq!(ledger.version(), Version::from_value(8));
    }

    #[test]
    fn exhausted_version_leaves_ledger_untouched() {
        let mut ledger = EventLedger::rehydrated(Version::from_value(usize::MAX));
        assert!(ledger.record(vec!["late"]).is_err());
        assert_eq!(ledger.version(), Version::from_value(usize::MAX));
        assert!(!ledger.has_uncommitted());
    }
}
