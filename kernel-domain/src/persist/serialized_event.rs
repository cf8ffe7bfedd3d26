//! 事件持久化模型（SerializedEvent）
//!
//! 定义事件在持久化层的标准形态与在 `EventEnvelope` 间的转换，
//! 并提供批量序列化/反序列化的工具函数。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    aggregate::AggregateRoot,
    domain_event::{EventEnvelope, EventPosition, Metadata},
    error::{DomainError, DomainResult},
    identity::Identity,
};

#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct SerializedEvent {
    /// 事件唯一标识符
    event_id: Uuid,
    /// 事件类型，用于区分不同的事件
    #[builder(into)]
    event_type: String,
    /// 事件版本，用于事件版本控制
    event_version: usize,
    /// 聚合 ID，标识事件所属的聚合根实例
    #[builder(into)]
    aggregate_id: String,
    /// 聚合类型，用于区分不同的聚合根
    #[builder(into)]
    aggregate_type: String,
    /// 事件在聚合流中的位置
    position: EventPosition,
    /// 事件发生时间
    occurred_at: DateTime<Utc>,
    /// 事件负载，存储事件的具体数据
    payload: Value,
}

impl SerializedEvent {
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> usize {
        self.event_version
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn position(&self) -> EventPosition {
        self.position
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

impl<A> TryFrom<&EventEnvelope<A>> for SerializedEvent
where
    A: AggregateRoot,
{
    type Error = serde_json::Error;

    fn try_from(envelope: &EventEnvelope<A>) -> Result<Self, Self::Error> {
        let metadata = envelope.metadata();
        Ok(SerializedEvent::builder()
            .event_id(metadata.event_id())
            .event_type(metadata.event_type())
            .event_version(metadata.event_version())
            .aggregate_id(envelope.aggregate_id().as_str())
            .aggregate_type(metadata.aggregate_type())
            .position(metadata.position())
            .occurred_at(metadata.occurred_at())
            .payload(serde_json::to_value(envelope.payload())?)
            .build())
    }
}

impl<A> TryFrom<&SerializedEvent> for EventEnvelope<A>
where
    A: AggregateRoot,
{
    type Error = DomainError;

    fn try_from(value: &SerializedEvent) -> Result<Self, Self::Error> {
        if value.aggregate_type != A::TYPE {
            return Err(DomainError::TypeMismatch {
                expected: A::TYPE.to_string(),
                found: value.aggregate_type.clone(),
            });
        }

        let metadata = Metadata::builder()
            .event_id(value.event_id)
            .event_type(value.event_type.clone())
            .event_version(value.event_version)
            .aggregate_type(value.aggregate_type.clone())
            .position(value.position)
            .occurred_at(value.occurred_at)
            .build();

        let aggregate_id = Identity::<A>::new(value.aggregate_id.clone())?;
        let payload: A::Event = serde_json::from_value(value.payload.clone())?;

        Ok(EventEnvelope::new(aggregate_id, metadata, payload))
    }
}

pub fn serialize_events<A>(events: &[EventEnvelope<A>]) -> DomainResult<Vec<SerializedEvent>>
where
    A: AggregateRoot,
{
    let events = events
        .iter()
        .map(SerializedEvent::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

pub fn deserialize_events<A>(events: &[SerializedEvent]) -> DomainResult<Vec<EventEnvelope<A>>>
where
    A: AggregateRoot,
{
    events.iter().map(EventEnvelope::try_from).collect()
}
