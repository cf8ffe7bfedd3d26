//! 唯一性解析协议
//!
//! 跨聚合的唯一性约束（例如“用户名全局唯一”）只能由数据存储回答。
//! 内核把这一能力抽象为 `UniquenessChecker`，由协调层在调用聚合操作之前查询；
//! 聚合本身从不持有、也不会触达该能力。
//!
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use kernel_macros::value_object;
use thiserror::Error;

use crate::error::{DomainResult, ValidationError};
use crate::value_object::{StructuralKey, ValueObject};

fn check_claim(claim: &UniquenessClaim) -> Result<(), ValidationError> {
    if claim.scope.trim().is_empty() {
        return Err(ValidationError::new(
            "UniquenessClaim",
            "scope",
            "must not be empty",
        ));
    }
    if claim.field.trim().is_empty() {
        return Err(ValidationError::new(
            "UniquenessClaim",
            "field",
            "must not be empty",
        ));
    }
    Ok(())
}

/// 唯一性声明：在 `scope` 中，`field` 取值为 `candidate` 的记录是否已存在
///
/// 候选值以类型标记的结构键保存，因此不同声明类型的同形值不会互相冲突。
#[value_object(validate = check_claim)]
pub struct UniquenessClaim {
    scope: String,
    field: String,
    candidate: StructuralKey,
}

impl UniquenessClaim {
    pub fn new<V: ValueObject>(
        scope: impl Into<String>,
        field: impl Into<String>,
        candidate: &V,
    ) -> DomainResult<Self> {
        candidate.validate()?;
        let claim = Self {
            scope: scope.into(),
            field: field.into(),
            candidate: candidate.structural_key()?,
        }
        .validated()?;
        Ok(claim)
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn candidate(&self) -> &StructuralKey {
        &self.candidate
    }

    /// 便于展示的候选值：单字符串候选返回其文本，否则返回结构键
    pub fn display_value(&self) -> String {
        self.candidate
            .as_text()
            .unwrap_or_else(|| self.candidate.to_string())
    }
}

impl fmt::Display for UniquenessClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}={}", self.scope, self.field, self.candidate)
    }
}

/// 唯一性查询不可用（超时、后端故障等），与“已存在/不存在”的确定答复相区分
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("uniqueness lookup unavailable: {reason}")]
pub struct UnavailableError {
    reason: String,
}

impl UnavailableError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// 外部提供的唯一性查询能力
#[async_trait]
pub trait UniquenessChecker: Send + Sync {
    /// 候选值在范围内是否已存在
    ///
    /// 后端必须保证对同一范围内同一值的并发声明具有“检查并预留”语义：
    /// 至多一个调用方得到 `false`。
    async fn exists(&self, claim: &UniquenessClaim) -> Result<bool, UnavailableError>;

    /// 释放预留；协调调用在查询之后失败时使用。默认不做任何事。
    async fn release(&self, claim: &UniquenessClaim) -> Result<(), UnavailableError> {
        let _ = claim;
        Ok(())
    }
}

#[async_trait]
impl<T> UniquenessChecker for Arc<T>
where
    T: UniquenessChecker + ?Sized,
{
    async fn exists(&self, claim: &UniquenessClaim) -> Result<bool, UnavailableError> {
        (**self).exists(claim).await
    }

    async fn release(&self, claim: &UniquenessClaim) -> Result<(), UnavailableError> {
        (**self).release(claim).await
    }
}
