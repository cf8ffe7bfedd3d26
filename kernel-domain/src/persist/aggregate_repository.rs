//! 聚合仓储端口
//!
//! 内核只约定“以期望版本提交一批事件”这一窄接口，加载与存储机制由外部协作者提供。
//!
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::aggregate::AggregateRoot;
use crate::domain_event::EventEnvelope;
use crate::identity::Identity;
use crate::value_object::Version;

/// 提交失败
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("concurrency conflict: aggregate={aggregate_id}, expected={expected}, actual={actual}")]
    ConcurrencyConflict {
        aggregate_id: String,
        expected: Version,
        actual: Version,
    },
    #[error("storage error: {reason}")]
    Storage { reason: String },
}

impl CommitError {
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage {
            reason: reason.into(),
        }
    }
}

#[async_trait]
pub trait AggregateRepository<A>: Send + Sync
where
    A: AggregateRoot,
{
    /// 以乐观并发方式提交事件
    ///
    /// 存储中的版本与 `expected_version` 不一致时返回 `ConcurrencyConflict`，
    /// 成功后存储版本变为 `expected_version + 1`。
    async fn commit(
        &self,
        aggregate_id: &Identity<A>,
        expected_version: Version,
        events: &[EventEnvelope<A>],
    ) -> Result<(), CommitError>;
}

#[async_trait]
impl<A, T> AggregateRepository<A> for Arc<T>
where
    A: AggregateRoot,
    T: AggregateRepository<A> + ?Sized,
{
    async fn commit(
        &self,
        aggregate_id: &Identity<A>,
        expected_version: Version,
        events: &[EventEnvelope<A>],
    ) -> Result<(), CommitError> {
        (**self).commit(aggregate_id, expected_version, events).await
    }
}
