//! 标识（Identity）
//!
//! 对不透明令牌的强类型包装，类型参数 `K` 限定其所属的实体种类：
//! `Identity<User>` 与 `Identity<Order>` 即使令牌相同也无法比较。
//! 令牌在构造时校验非空，之后不可修改。
//!
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

pub struct Identity<K> {
    token: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Identity<K> {
    /// 使用已有令牌创建标识；空白令牌返回 `InvalidIdentity`
    pub fn new(token: impl Into<String>) -> DomainResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DomainError::invalid_identity(
                Self::kind(),
                "identity token must not be empty",
            ));
        }
        Ok(Self {
            token,
            _kind: PhantomData,
        })
    }

    /// 生成新的标识（UUIDv7，按时间有序）
    pub fn generate() -> Self {
        Self {
            token: Uuid::now_v7().to_string(),
            _kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// 所属实体种类的类型名
    pub fn kind() -> &'static str {
        std::any::type_name::<K>()
    }
}

// 手写实现：不对 K 施加任何约束

impl<K> Clone for Identity<K> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> PartialEq for Identity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl<K> Eq for Identity<K> {}

impl<K> Hash for Identity<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

impl<K> fmt::Debug for Identity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity<{}>({})", Self::kind(), self.token)
    }
}

impl<K> fmt::Display for Identity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

impl<K> AsRef<str> for Identity<K> {
    fn as_ref(&self) -> &str {
        &self.token
    }
}

impl<K> FromStr for Identity<K> {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<K> Serialize for Identity<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token)
    }
}

impl<'de, K> Deserialize<'de> for Identity<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Self::new(token).map_err(serde::de::Error::custom)
    }
}
