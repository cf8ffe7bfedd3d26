//! 领域事件（Domain Event）
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`），事件在聚合流中的位置
//! （`EventPosition`），以及将事件与元数据封装后的 `EventEnvelope`。

mod domain_event_trait;
mod event_envelope;
mod metadata;

pub use domain_event_trait::DomainEvent;
pub use event_envelope::EventEnvelope;
pub use metadata::{EventPosition, Metadata};
