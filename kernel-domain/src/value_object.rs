//! 值对象（Value Object）
//!
//! 无标识、以结构相等为准的不可变对象：
//! - 相等与哈希由声明类型 + 按声明顺序的组成部分决定（`#[value_object]` 派生）；
//! - 构造时经 `validated` 完整校验，失败返回指明组成部分的 `ValidationError`；
//! - 不暴露修改器，“修改”只能通过 `with_changes` 产生重新校验过的新实例。
//!
//! 跨类型比较使用 `StructuralKey`：键中携带声明类型名，因此两个组成部分恰好相同、
//! 但声明类型不同的值不会相等。
//!
use std::fmt;
use std::hash::Hash;

use kernel_macros::value_object;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, ValidationError};

/// 值对象抽象
pub trait ValueObject: Clone + Eq + Hash + fmt::Debug + Serialize {
    /// 声明类型名，参与结构键的相等判断
    const TYPE: &'static str;

    /// 校验全部组成部分
    fn validate(&self) -> Result<(), ValidationError>;

    /// 校验工厂：通过则返回自身，否则丢弃这个半成品
    fn validated(self) -> Result<Self, ValidationError> {
        self.validate()?;
        Ok(self)
    }

    /// 以修改后的组成部分构造新实例，并重新执行完整校验；原实例保持不变
    fn with_changes<F>(&self, change: F) -> Result<Self, ValidationError>
    where
        F: FnOnce(&mut Self),
    {
        let mut next = self.clone();
        change(&mut next);
        next.validated()
    }

    /// 类型标记的结构键
    fn structural_key(&self) -> DomainResult<StructuralKey> {
        StructuralKey::of(self)
    }
}

/// 类型标记的结构键：声明类型名 + 组成部分的规范化 JSON
///
/// 规范化经由 `serde_json::Value`，对象键按字典序排列，
/// 因此相等的值总是产生相同的键。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructuralKey {
    value_type: String,
    components: String,
}

impl StructuralKey {
    pub fn of<V: ValueObject>(value: &V) -> DomainResult<Self> {
        let canonical = serde_json::to_value(value)?;
        Ok(Self {
            value_type: V::TYPE.to_string(),
            components: canonical.to_string(),
        })
    }

    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    /// 组成部分的规范化 JSON 文本
    pub fn components(&self) -> &str {
        &self.components
    }

    /// 组成部分恰为单个字符串时返回该字符串
    pub fn as_text(&self) -> Option<String> {
        serde_json::from_str::<String>(&self.components).ok()
    }
}

impl fmt::Display for StructuralKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.value_type, self.components)
    }
}

macro_rules! primitive_value_object {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl ValueObject for $ty {
                const TYPE: &'static str = $name;

                fn validate(&self) -> Result<(), ValidationError> {
                    Ok(())
                }
            }
        )*
    };
}

primitive_value_object!(
    String => "String",
    bool => "bool",
    char => "char",
    i32 => "i32",
    i64 => "i64",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
);

/// 版本号（用于乐观锁和并发控制）
///
/// 聚合每成功完成一次变更批次，版本号恰好加一。
///
/// # 示例
///
/// ```
/// use kernel_domain::value_object::Version;
///
/// let v1 = Version::new();
/// assert_eq!(v1.value(), 0);
/// assert!(v1.is_new());
///
/// let v2 = v1.next().unwrap();
/// assert_eq!(v2.value(), 1);
/// assert!(Version::from_value(usize::MAX).next().is_err());
/// assert!(v2 > v1);
/// ```
#[value_object]
#[derive(Copy, PartialOrd, Ord, Default, Deserialize)]
pub struct Version(usize);

impl Version {
    /// 初始版本（0）
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_value(value: usize) -> Self {
        Self(value)
    }

    /// 下一个版本号；已到 `usize::MAX` 时返回 `VersionExhausted`
    pub fn next(&self) -> DomainResult<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or(DomainError::VersionExhausted { current: self.0 })
    }

    pub const fn value(&self) -> usize {
        self.0
    }

    /// 是否为初始版本
    pub fn is_new(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<usize> for Version {
    fn from(value: usize) -> Self {
        Self::from_value(value)
    }
}

impl From<Version> for usize {
    fn from(version: Version) -> Self {
        version.value()
    }
}
