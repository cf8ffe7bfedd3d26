use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kernel_domain::aggregate::AggregateRoot;
use kernel_domain::domain_event::EventEnvelope;
use kernel_domain::identity::Identity;
use kernel_domain::persist::{AggregateRepository, CommitError, SerializedEvent, serialize_events};
use kernel_domain::value_object::Version;
use tracing::debug;

#[derive(Debug, Default)]
struct Stream {
    version: Version,
    events: Vec<SerializedEvent>,
}

/// 基于内存的聚合仓储
/// - 按 `聚合类型:聚合 ID` 维护事件流与已提交版本
/// - 提交时比较期望版本，成功后版本变为 `expected_version + 1`
#[derive(Debug, Default)]
pub struct InMemoryAggregateRepository {
    streams: DashMap<String, Stream>,
}

impl InMemoryAggregateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已提交版本；没有提交过的聚合为初始版本
    pub fn stream_version<A: AggregateRoot>(&self, aggregate_id: &Identity<A>) -> Version {
        self.streams
            .get(&stream_key::<A>(aggregate_id))
            .map(|stream| stream.version)
            .unwrap_or_default()
    }

    /// 已提交的事件，按提交顺序
    pub fn events<A: AggregateRoot>(&self, aggregate_id: &Identity<A>) -> Vec<SerializedEvent> {
        self.streams
            .get(&stream_key::<A>(aggregate_id))
            .map(|stream| stream.events.clone())
            .unwrap_or_default()
    }
}

fn stream_key<A: AggregateRoot>(aggregate_id: &Identity<A>) -> String {
    format!("{}:{}", A::TYPE, aggregate_id)
}

#[async_trait]
impl<A> AggregateRepository<A> for InMemoryAggregateRepository
where
    A: AggregateRoot,
{
    async fn commit(
        &self,
        aggregate_id: &Identity<A>,
        expected_version: Version,
        events: &[EventEnvelope<A>],
    ) -> Result<(), CommitError> {
        let serialized =
            serialize_events(events).map_err(|err| CommitError::storage(err.to_string()))?;

        let next = expected_version
            .next()
            .map_err(|err| CommitError::storage(err.to_string()))?;
        let conflict = |actual: Version| CommitError::ConcurrencyConflict {
            aggregate_id: aggregate_id.to_string(),
            expected: expected_version,
            actual,
        };

        // 版本比较通过之后才创建或修改事件流
        match self.streams.entry(stream_key::<A>(aggregate_id)) {
            Entry::Occupied(mut occupied) => {
                let stream = occupied.get_mut();
                if stream.version != expected_version {
                    return Err(conflict(stream.version));
                }
                stream.events.extend(serialized);
                stream.version = next;
            }
            Entry::Vacant(vacant) => {
                if !expected_version.is_new() {
                    return Err(conflict(Version::new()));
                }
                vacant.insert(Stream {
                    version: next,
                    events: serialized,
                });
            }
        }

        debug!(
            aggregate_type = A::TYPE,
            aggregate_id = %aggregate_id,
            version = %next,
            "stream appended"
        );
        Ok(())
    }
}
