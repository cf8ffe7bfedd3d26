//! 领域建模内核（kernel-domain）
//!
//! 提供构建富领域对象所需的最小抽象：
//! - 值对象（`value_object`）：结构相等、不可变、构造即校验；
//! - 标识与实体（`identity`、`entity`）：相等只由标识决定；
//! - 聚合根（`aggregate`）：不变量闸门、只追加的未提交事件日志、乐观并发版本号；
//! - 领域事件（`domain_event`）与规约/不变量（`specification`）；
//! - 唯一性解析协议（`uniqueness`）与持久化端口（`persist`）。
//!
//! 本 crate 不做任何 I/O：唯一性查询与事件提交都是外部协作者通过窄接口提供的能力，
//! 由应用层的协调器在聚合之外编排。
//!
//! 典型用法：
//! 1. 用 `#[value_object]` 定义值对象，用 `#[domain_event]` 定义事件枚举；
//! 2. 用 `#[aggregate_root(event = ...)]` 定义聚合，实现 `AggregateRoot` 的 `apply/invariants`；
//! 3. 通过 `mutate` 完成原子变更，通过 `pull_uncommitted_events` 取出事件交给仓储。
//!
pub mod aggregate;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod identity;
pub mod persist;
pub mod specification;
pub mod uniqueness;
pub mod value_object;

// 允许在本 crate 内部通过 ::kernel_domain 进行自引用，
// 以便过程宏在本 crate 中也能解析到 ::kernel_domain 路径。
extern crate self as kernel_domain;
