//! 持久化端口（persist）
//!
//! - 聚合仓储端口（`AggregateRepository`）：以期望版本提交事件，检测并发冲突；
//! - 事件的持久化形态（`SerializedEvent`）与批量序列化/反序列化。
//!
//! 具体存储后端由上层提供实现并注入。
//!
mod aggregate_repository;
mod serialized_event;

pub use aggregate_repository::{AggregateRepository, CommitError};
pub use serialized_event::{SerializedEvent, deserialize_events, serialize_events};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{AggregateRoot, EventLedger};
    use crate::error::DomainError;
    use crate::identity::Identity;
    use kernel_macros::{aggregate_root, domain_event};

    #[domain_event(version = 2)]
    enum UserEvent {
        #[event(event_type = "UsernameSet")]
        UsernameSet { username: String },
    }

    #[aggregate_root(event = UserEvent)]
    struct User {
        username: Option<String>,
    }

    impl AggregateRoot for User {
        const TYPE: &'static str = "user";

        fn apply(&mut self, event: &UserEvent) {
            match event {
                UserEvent::UsernameSet { username } => self.username = Some(username.clone()),
            }
        }
    }

    #[aggregate_root(event = UserEvent)]
    struct Account {}

    impl AggregateRoot for Account {
        const TYPE: &'static str = "account";

        fn apply(&mut self, _event: &UserEvent) {}
    }

    fn pulled_events() -> Vec<crate::domain_event::EventEnvelope<User>> {
        let mut user = User {
            id: Identity::new("u-1").unwrap(),
            ledger: EventLedger::new(),
            username: None,
        };
        user.mutate(|_| {
            Ok(vec![UserEvent::UsernameSet {
                username: "alice".into(),
            }])
        })
        .unwrap();
        user.pull_uncommitted_events()
    }

    #[test]
    fn serialize_deserialize_roundtrip() {
        let envelopes = pulled_events();
        let serialized = serialize_events(&envelopes).unwrap();

        assert_eq!(serialized.len(), 1);
        let first = &serialized[0];
        assert_eq!(first.event_type(), "UsernameSet");
        assert_eq!(first.event_version(), 2);
        assert_eq!(first.aggregate_id(), "u-1");
        assert_eq!(first.aggregate_type(), "user");
        assert_eq!(first.payload()["UsernameSet"]["username"], "alice");

        let back = deserialize_events::<User>(&serialized).unwrap();
        assert_eq!(back, envelopes);
    }

    #[test]
    fn deserialize_rejects_other_aggregate_type() {
        let serialized = serialize_events(&pulled_events()).unwrap();
        match deserialize_events::<Account>(&serialized).unwrap_err() {
            DomainError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "account");
                assert_eq!(found, "user");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn commit_error_display() {
        let err = CommitError::ConcurrencyConflict {
            aggregate_id: "u-1".into(),
            expected: 1.into(),
            actual: 2.into(),
        };
        assert_eq!(
            err.to_string(),
            "concurrency conflict: aggregate=u-1, expected=v1, actual=v2"
        );
    }
}
