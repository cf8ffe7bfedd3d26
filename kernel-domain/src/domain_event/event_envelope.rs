use std::fmt;

use crate::aggregate::{AggregateRoot, RecordedEvent};
use crate::identity::Identity;

use super::domain_event_trait::DomainEvent;
use super::metadata::Metadata;

/// 事件信封，包含所属聚合标识、元数据与事件载荷
///
/// 由 `AggregateRoot::pull_uncommitted_events` 产生，交给仓储提交。
pub struct EventEnvelope<A>
where
    A: AggregateRoot,
{
    aggregate_id: Identity<A>,
    metadata: Metadata,
    payload: A::Event,
}

impl<A> EventEnvelope<A>
where
    A: AggregateRoot,
{
    pub fn new(aggregate_id: Identity<A>, metadata: Metadata, payload: A::Event) -> Self {
        Self {
            aggregate_id,
            metadata,
            payload,
        }
    }

    pub(crate) fn from_recorded(aggregate_id: Identity<A>, recorded: RecordedEvent<A::Event>) -> Self {
        let (event_id, position, occurred_at, payload) = recorded.into_parts();
        let metadata = Metadata::builder()
            .event_id(event_id)
            .event_type(payload.event_type())
            .event_version(payload.event_version())
            .aggregate_type(A::TYPE)
            .position(position)
            .occurred_at(occurred_at)
            .build();

        Self::new(aggregate_id, metadata, payload)
    }

    pub fn aggregate_id(&self) -> &Identity<A> {
        &self.aggregate_id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn payload(&self) -> &A::Event {
        &self.payload
    }

    pub fn into_payload(self) -> A::Event {
        self.payload
    }
}

impl<A> Clone for EventEnvelope<A>
where
    A: AggregateRoot,
{
    fn clone(&self) -> Self {
        Self {
            aggregate_id: self.aggregate_id.clone(),
            metadata: self.metadata.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl<A> PartialEq for EventEnvelope<A>
where
    A: AggregateRoot,
{
    fn eq(&self, other: &Self) -> bool {
        self.aggregate_id == other.aggregate_id
            && self.metadata == other.metadata
            && self.payload == other.payload
    }
}

impl<A> fmt::Debug for EventEnvelope<A>
where
    A: AggregateRoot,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEnvelope")
            .field("aggregate_id", &self.aggregate_id)
            .field("metadata", &self.metadata)
            .field("payload", &self.payload)
            .finish()
    }
}
