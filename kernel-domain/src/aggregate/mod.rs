//! 聚合根（Aggregate Root）
//!
//! 聚合根是一致性边界与版本单位。每次变更按以下状态机执行：
//!
//! ```text
//! Idle -> Validating -> Committed  -> Idle
//!                    \-> RolledBack -> Idle
//! ```
//!
//! - `Validating`：在暂存副本上执行决策、应用事件、检查全部不变量；
//! - `Committed`：暂存副本替换原状态，事件追加到未提交日志，版本恰好加一；
//! - `RolledBack`：丢弃暂存副本，状态、版本与日志保持不变。
//!
//! 单写者约定：同一实例的变更由 `&mut self` 独占，不做内部加锁；
//! 跨进程的并发由仓储提交时的版本比较检测，聚合自身不重试。
//!
mod ledger;

pub use ledger::{EventLedger, RecordedEvent};

use std::fmt;

use crate::domain_event::{DomainEvent, EventEnvelope};
use crate::entity::Entity;
use crate::error::DomainResult;
use crate::specification::Invariant;
use crate::value_object::Version;

/// 持有事件账本的类型，通常由 `#[aggregate_root(event = ...)]` 生成
pub trait HasLedger {
    type Event: DomainEvent;

    fn ledger(&self) -> &EventLedger<Self::Event>;

    #[doc(hidden)]
    fn ledger_mut(&mut self) -> &mut EventLedger<Self::Event>;
}

/// 聚合根抽象
///
/// 使用者只需提供 `TYPE`、`apply` 与（可选的）`invariants`，
/// 变更、预演与事件收集由默认方法完成。
pub trait AggregateRoot: Entity + HasLedger + Clone + fmt::Debug + Send + Sync + 'static {
    /// 聚合类型名
    const TYPE: &'static str;

    /// 将事件应用到状态上；只做状态迁移，不做校验
    fn apply(&mut self, event: &Self::Event);

    /// 声明的不变量，按声明顺序检查
    fn invariants() -> Vec<Invariant<Self>> {
        Vec::new()
    }

    fn version(&self) -> Version {
        self.ledger().version()
    }

    /// 按声明顺序检查不变量，返回第一个不成立的不变量
    fn apply_invariants(&self) -> DomainResult<()> {
        Self::invariants()
            .iter()
            .try_for_each(|invariant| invariant.check(Self::TYPE, self))
    }

    /// 预演：在暂存副本上执行决策与不变量检查，返回将会产生的事件，不修改任何状态
    fn preview<F>(&self, decide: F) -> DomainResult<Vec<Self::Event>>
    where
        F: FnOnce(&Self) -> DomainResult<Vec<Self::Event>>,
    {
        stage(self, decide).map(|(_, events)| events)
    }

    /// 原子变更：成功时追加事件并使版本加一（即使没有事件），失败时不产生任何可观察的变化
    fn mutate<F>(&mut self, decide: F) -> DomainResult<Version>
    where
        F: FnOnce(&Self) -> DomainResult<Vec<Self::Event>>,
    {
        let (mut draft, events) = stage(&*self, decide)?;
        let version = draft.ledger_mut().record(events)?;
        *self = draft;
        Ok(version)
    }

    /// 未提交事件的只读视图
    fn uncommitted_events(&self) -> &[RecordedEvent<Self::Event>] {
        self.ledger().uncommitted()
    }

    /// 按产生顺序取出全部未提交事件并清空日志；紧接着再次调用返回空
    fn pull_uncommitted_events(&mut self) -> Vec<EventEnvelope<Self>> {
        let aggregate_id = self.id().clone();
        self.ledger_mut()
            .drain()
            .into_iter()
            .map(|recorded| EventEnvelope::from_recorded(aggregate_id.clone(), recorded))
            .collect()
    }
}

fn stage<A, F>(aggregate: &A, decide: F) -> DomainResult<(A, Vec<A::Event>)>
where
    A: AggregateRoot,
    F: FnOnce(&A) -> DomainResult<Vec<A::Event>>,
{
    let events = decide(aggregate).inspect_err(|err| {
        tracing::debug!(aggregate_type = A::TYPE, aggregate_id = %aggregate.id(), error = %err, "operation rejected");
    })?;

    let mut draft = aggregate.clone();
    for event in &events {
        draft.apply(event);
    }

    draft.apply_invariants().inspect_err(|err| {
        tracing::debug!(aggregate_type = A::TYPE, aggregate_id = %aggregate.id(), error = %err, "rolled back");
    })?;

    Ok((draft, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use crate::identity::Identity;
    use kernel_macros::{aggregate_root, domain_event};

    #[domain_event]
    enum CounterEvent {
        Added { amount: i64 },
        Reset,
    }

    #[aggregate_root(event = CounterEvent)]
    struct Counter {
        total: i64,
    }

    impl Counter {
        fn new(id: &str) -> Self {
            Self {
                id: Identity::new(id).unwrap(),
                ledger: EventLedger::new(),
                total: 0,
            }
        }

        fn add(&mut self, amount: i64) -> DomainResult<Version> {
            self.mutate(|_| Ok(vec![CounterEvent::Added { amount }]))
        }
    }

    impl AggregateRoot for Counter {
        const TYPE: &'static str = "counter";

        fn apply(&mut self, event: &CounterEvent) {
            match event {
                CounterEvent::Added { amount } => self.total += amount,
                CounterEvent::Reset => self.total = 0,
            }
        }

        fn invariants() -> Vec<Invariant<Self>> {
            vec![
                Invariant::new("non_negative", |c: &Counter| c.total >= 0),
                Invariant::new("at_most_100", |c: &Counter| c.total <= 100),
            ]
        }
    }

    #[test]
    fn success_appends_events_and_bumps_version_once() {
        let mut counter = Counter::new("c-1");
        let version = counter
            .mutate(|_| {
                Ok(vec![
                    CounterEvent::Added { amount: 3 },
                    CounterEvent::Added { amount: 4 },
                ])
            })
            .unwrap();

        assert_eq!(version, Version::from_value(1));
        assert_eq!(counter.version(), version);
        assert_eq!(counter.total, 7);
        assert_eq!(counter.uncommitted_events().len(), 2);
    }

    #[test]
    fn violation_leaves_state_version_and_log_identical() {
        let mut counter = Counter::new("c-1");
        counter.add(5).unwrap();
        let before = counter.clone();

        let err = counter.add(-10).unwrap_err();
        match err {
            DomainError::InvariantViolation {
                aggregate_type,
                invariant,
            } => {
                assert_eq!(aggregate_type, "counter");
                assert_eq!(invariant, "non_negative");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(counter.total, before.total);
        assert_eq!(counter.ledger(), before.ledger());
    }

    #[domain_event]
    enum RangeEvent {
        Set { low: i64, high: i64 },
    }

    #[aggregate_root(event = RangeEvent)]
    struct Range {
        low: i64,
        high: i64,
    }

    impl AggregateRoot for Range {
        const TYPE: &'static str = "range";

        fn apply(&mut self, event: &RangeEvent) {
            match event {
                RangeEvent::Set { low, high } => {
                    self.low = *low;
                    self.high = *high;
                }
            }
        }

        fn invariants() -> Vec<Invariant<Self>> {
            vec![
                Invariant::new("ordered", |r: &Range| r.low <= r.high),
                Invariant::new("high_within_limit", |r: &Range| r.high <= 50),
            ]
        }
    }

    #[test]
    fn first_violated_invariant_is_reported() {
        let mut range = Range {
            id: Identity::new("r-1").unwrap(),
            ledger: EventLedger::new(),
            low: 0,
            high: 10,
        };
        range
            .mutate(|_| Ok(vec![RangeEvent::Set { low: 1, high: 20 }]))
            .unwrap();
        let before = range.clone();

        // 同时违反两个不变量
        let err = range
            .mutate(|_| Ok(vec![RangeEvent::Set { low: 80, high: 60 }]))
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvariantViolation {
                aggregate_type: "range",
                invariant: "ordered",
            }
        ));
        assert_eq!((range.low, range.high), (1, 20));
        assert_eq!(range.version(), Version::from_value(1));
        assert_eq!(range.ledger(), before.ledger());

        let broken = Range {
            low: 80,
            high: 60,
            ..before
        };
        assert!(matches!(
            broken.apply_invariants(),
            Err(DomainError::InvariantViolation { invariant: "ordered", .. })
        ));
    }

    #[test]
    fn rejected_decision_changes_nothing() {
        let mut counter = Counter::new("c-1");
        let err = counter
            .mutate(|_| Err(DomainError::rule("closed", "counter is closed")))
            .unwrap_err();
        assert!(matches!(err, DomainError::RuleViolation { rule: "closed", .. }));
        assert!(counter.version().is_new());
        assert!(counter.uncommitted_events().is_empty());
    }

    #[test]
    fn empty_batch_still_bumps_version() {
        let mut counter = Counter::new("c-1");
        counter.mutate(|_| Ok(vec![])).unwrap();
        assert_eq!(counter.version(), Version::from_value(1));
        assert!(counter.uncommitted_events().is_empty());
    }

    #[test]
    fn pull_returns_events_in_order_then_empty() {
        let mut counter = Counter::new("c-1");
        counter.add(1).unwrap();
        counter.mutate(|_| Ok(vec![CounterEvent::Reset])).unwrap();

        let pulled = counter.pull_uncommitted_events();
        let payloads: Vec<_> = pulled.iter().map(|e| e.payload().clone()).collect();
        assert_eq!(
            payloads,
            vec![CounterEvent::Added { amount: 1 }, CounterEvent::Reset]
        );
        assert_eq!(pulled[0].metadata().event_type(), "CounterEvent.Added");
        assert_eq!(pulled[1].metadata().position().aggregate_version(), Version::from_value(2));
        assert_eq!(pulled[0].aggregate_id(), counter.id());

        assert!(counter.pull_uncommitted_events().is_empty());
        assert_eq!(counter.version(), Version::from_value(2));
    }

    #[test]
    fn preview_does_not_touch_the_aggregate() {
        let counter = Counter::new("c-1");
        let events = counter
            .preview(|_| Ok(vec![CounterEvent::Added { amount: 9 }]))
            .unwrap();
        assert_eq!(events, vec![CounterEvent::Added { amount: 9 }]);
        assert!(counter.preview(|_| Ok(vec![CounterEvent::Added { amount: 101 }])).is_err());

        assert_eq!(counter.total, 0);
        assert!(counter.version().is_new());
        assert!(counter.uncommitted_events().is_empty());
    }

    #[test]
    fn rehydrated_aggregate_starts_from_persisted_version() {
        let mut counter = Counter {
            id: Identity::new("c-9").unwrap(),
            ledger: EventLedger::rehydrated(Version::from_value(4)),
            total: 10,
        };
        assert!(counter.uncommitted_events().is_empty());
        assert_eq!(counter.add(1).unwrap(), Version::from_value(5));
    }
}
