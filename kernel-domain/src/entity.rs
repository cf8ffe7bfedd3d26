//! 实体（Entity）基础抽象
//!
//! 实体的相等与哈希只由标识决定：同一标识的两个实例即使属性不同（例如内存中的
//! 旧副本与已持久化的副本）也是同一个实体。`#[entity]` 宏会据此生成
//! `PartialEq`/`Eq`/`Hash`，并拒绝用户自行派生这些 trait。
//!
//! 实体不暴露可直接赋值的公有字段，属性只能经由其声明的操作修改。
//!
use crate::identity::Identity;

/// 具备唯一标识的实体抽象
pub trait Entity: Sized {
    /// 获取实体标识
    fn id(&self) -> &Identity<Self>;

    /// 是否与另一实例为同一实体（仅比较标识）
    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
