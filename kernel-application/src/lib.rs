//! 应用层协调（kernel-application）
//!
//! - `coordinator`：唯一性协调器，编排“查询 -> 变更 -> 提交”；
//! - `context`/`config`：调用上下文与协调器配置；
//! - `error`：应用层错误与稳定的错误分类；
//! - `observability`：tracing 初始化；
//! - 内存实现的唯一性索引与聚合仓储，便于测试与示例。
//!
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod inmemory_repository;
pub mod inmemory_uniqueness;
pub mod observability;

pub use coordinator::{CommitReceipt, UniqueValueCoordinator};
pub use inmemory_repository::InMemoryAggregateRepository;
pub use inmemory_uniqueness::InMemoryUniquenessIndex;
