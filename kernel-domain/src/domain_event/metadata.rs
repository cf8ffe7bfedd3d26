use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_object::Version;

/// 事件在聚合流中的位置：所属变更批次产生的聚合版本 + 批次内序号（从 1 开始）
///
/// 排序先比较版本，再比较序号，与事件产生顺序一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventPosition {
    aggregate_version: Version,
    sequence: usize,
}

impl EventPosition {
    pub fn new(aggregate_version: Version, sequence: usize) -> Self {
        Self {
            aggregate_version,
            sequence,
        }
    }

    pub fn aggregate_version(&self) -> Version {
        self.aggregate_version
    }

    pub fn sequence(&self) -> usize {
        self.sequence
    }
}

/// 元数据
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    event_id: Uuid,
    #[builder(into)]
    event_type: String,
    event_version: usize,
    #[builder(into)]
    aggregate_type: String,
    position: EventPosition,
    occurred_at: DateTime<Utc>,
}

impl Metadata {
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> usize {
        self.event_version
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
}
