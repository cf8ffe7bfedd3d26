//! 建模内核过程宏（kernel-macros）
//!
//! 为 `kernel-domain` 中的结构契约生成样板代码：
//! - `#[value_object]`：结构相等/哈希派生 + `ValueObject` 实现
//! - `#[entity]`：注入 `id` 字段，按标识实现相等与哈希
//! - `#[aggregate_root]`：在实体基础上注入事件账本 `ledger`
//! - `#[domain_event]`：为事件枚举实现 `DomainEvent`
//!
//! 生成的代码通过 `::kernel_domain` 绝对路径引用内核类型。
use proc_macro::TokenStream;

mod aggregate_root;
mod derive_utils;
mod domain_event;
mod entity;
mod field_utils;
mod value_object;

/// 值对象宏
///
/// - 合并/追加派生：Debug（可关闭）、Clone、PartialEq、Eq、Hash、Serialize
/// - 实现 `::kernel_domain::value_object::ValueObject`
/// - 参数：`#[value_object(name = "...", validate = path::to::fn, debug = true|false)]`
///   - `name` 默认取类型名，作为结构键中的声明类型
///   - `validate` 指向 `fn(&Self) -> Result<(), ValidationError>`，缺省视为恒成立
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}

/// 实体宏
///
/// - 若缺失则在最前追加 `id: Identity<Self>` 字段
/// - 派生 Debug（可关闭）与 Clone；禁止派生 PartialEq/Eq/Hash
/// - 实现 `Entity`，并按标识实现 `PartialEq`、`Eq`、`Hash`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 聚合根宏
///
/// 在 `#[entity]` 的基础上追加 `ledger: EventLedger<Event>` 字段并实现 `HasLedger`。
/// 参数：`#[aggregate_root(event = EventType, debug = true|false)]`，`event` 必填。
#[proc_macro_attribute]
pub fn aggregate_root(attr: TokenStream, item: TokenStream) -> TokenStream {
    aggregate_root::expand(attr, item)
}

/// 领域事件宏
///
/// 作用于枚举，支持具名/元组/单元变体：
/// - 合并/追加派生：Debug、Clone、PartialEq、Serialize、Deserialize
/// - 实现 `::kernel_domain::domain_event::DomainEvent`
/// - `#[domain_event(version = N)]` 指定默认载荷版本（默认 1）
/// - 变体可通过 `#[event(event_type = "...", event_version = N)]` 覆写，默认类型为 `Enum.Variant`
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}
