use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// 领域事件载荷需要满足的通用能力边界
///
/// 事件是已经发生的事实，一经记录不再修改；`#[domain_event]` 宏会为枚举生成本 trait 的实现。
pub trait DomainEvent:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// 事件类型（形如 `UserEvent.UsernameSet` 或自定义类型名）
    fn event_type(&self) -> &str;

    /// 事件载荷版本
    fn event_version(&self) -> usize;
}
