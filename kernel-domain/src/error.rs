//! 领域层统一错误定义
//!
//! 仅覆盖内核自身能产生的失败：值对象校验、标识、不变量、领域规则与序列化。
//! 唯一性查询不可用（`UnavailableError`）与提交失败（`CommitError`）分别定义在
//! `uniqueness` 与 `persist` 中，由外部协作者返回。
//!
use thiserror::Error;

/// 值对象构造校验失败，始终指明失败的组成部分
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {value_type}.{component}: {reason}")]
pub struct ValidationError {
    value_type: &'static str,
    component: &'static str,
    reason: String,
}

impl ValidationError {
    pub fn new(value_type: &'static str, component: &'static str, reason: impl Into<String>) -> Self {
        Self {
            value_type,
            component,
            reason: reason.into(),
        }
    }

    /// 值对象的声明类型名
    pub fn value_type(&self) -> &'static str {
        self.value_type
    }

    /// 校验失败的组成部分名
    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// 统一错误类型（领域内核最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 值对象/标识 ---
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid identity: kind={kind}, reason={reason}")]
    InvalidIdentity { kind: &'static str, reason: String },

    // --- 聚合不变量与领域规则 ---
    #[error("invariant violated: aggregate={aggregate_type}, invariant={invariant}")]
    InvariantViolation {
        aggregate_type: &'static str,
        invariant: &'static str,
    },
    #[error("rule violated: rule={rule}, reason={reason}")]
    RuleViolation { rule: &'static str, reason: String },
    #[error("version exhausted: current={current}")]
    VersionExhausted { current: usize },

    // --- 序列化 ---
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch { expected: String, found: String },
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

impl DomainError {
    pub fn rule(rule: &'static str, reason: impl Into<String>) -> Self {
        Self::RuleViolation {
            rule,
            reason: reason.into(),
        }
    }

    pub fn invalid_identity(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            kind,
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
