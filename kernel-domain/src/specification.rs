//! 规约（Specification）与聚合不变量（Invariant）
//!
//! 规约封装可复用、可组合的业务判断；不变量是带名称的规约，
//! 由聚合根在每次变更尝试之后按声明顺序逐一检查。
//!
use crate::error::{DomainError, DomainResult};

/// 规约模式的核心 trait
pub trait Specification<T> {
    /// 检查候选对象是否满足规约
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// 与另一个规约进行 AND 组合
    fn and<S>(self, other: S) -> AndSpecification<T>
    where
        Self: Sized + Send + Sync + 'static,
        S: Specification<T> + Send + Sync + 'static,
    {
        AndSpecification::new(Box::new(self), Box::new(other))
    }

    /// 与另一个规约进行 OR 组合
    fn or<S>(self, other: S) -> OrSpecification<T>
    where
        Self: Sized + Send + Sync + 'static,
        S: Specification<T> + Send + Sync + 'static,
    {
        OrSpecification::new(Box::new(self), Box::new(other))
    }

    /// 对规约取反
    fn not(self) -> NotSpecification<T>
    where
        Self: Sized + Send + Sync + 'static,
    {
        NotSpecification::new(Box::new(self))
    }
}

/// 任意 `Fn(&T) -> bool` 闭包都是规约
impl<T, F> Specification<T> for F
where
    F: Fn(&T) -> bool,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self(candidate)
    }
}

pub type BoxedSpecification<T> = Box<dyn Specification<T> + Send + Sync>;

/// AND 组合规约
pub struct AndSpecification<T> {
    left: BoxedSpecification<T>,
    right: BoxedSpecification<T>,
}

impl<T> AndSpecification<T> {
    pub fn new(left: BoxedSpecification<T>, right: BoxedSpecification<T>) -> Self {
        Self { left, right }
    }
}

impl<T> Specification<T> for AndSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }
}

/// OR 组合规约
pub struct OrSpecification<T> {
    left: BoxedSpecification<T>,
    right: BoxedSpecification<T>,
}

impl<T> OrSpecification<T> {
    pub fn new(left: BoxedSpecification<T>, right: BoxedSpecification<T>) -> Self {
        Self { left, right }
    }
}

impl<T> Specification<T> for OrSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) || self.right.is_satisfied_by(candidate)
    }
}

/// NOT 规约
pub struct NotSpecification<T> {
    inner: BoxedSpecification<T>,
}

impl<T> NotSpecification<T> {
    pub fn new(inner: BoxedSpecification<T>) -> Self {
        Self { inner }
    }
}

impl<T> Specification<T> for NotSpecification<T> {
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.inner.is_satisfied_by(candidate)
    }
}

/// 带名称的不变量
///
/// 名称会出现在 `DomainError::InvariantViolation` 中，调用方据此渲染提示，无需匹配字符串。
pub struct Invariant<A> {
    name: &'static str,
    rule: BoxedSpecification<A>,
}

impl<A> Invariant<A> {
    pub fn new<F>(name: &'static str, rule: F) -> Self
    where
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        Self::satisfying(name, rule)
    }

    /// 以任意规约（含组合规约）声明不变量
    pub fn satisfying<S>(name: &'static str, spec: S) -> Self
    where
        S: Specification<A> + Send + Sync + 'static,
    {
        Self {
            name,
            rule: Box::new(spec),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn holds(&self, aggregate: &A) -> bool {
        self.rule.is_satisfied_by(aggregate)
    }

    /// 不成立时返回携带不变量名称的错误
    pub fn check(&self, aggregate_type: &'static str, aggregate: &A) -> DomainResult<()> {
        if self.holds(aggregate) {
            Ok(())
        } else {
            Err(DomainError::InvariantViolation {
                aggregate_type,
                invariant: self.name,
            })
        }
    }
}
