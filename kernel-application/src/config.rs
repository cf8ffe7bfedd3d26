use std::time::Duration;

use bon::Builder;
use serde::{Deserialize, Serialize};

/// 协调器配置
///
/// 可由 builder 构造，也可从任意 serde 格式加载；缺省字段取默认值。
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// 唯一性查询的超时（毫秒）；超时视为 `Unavailable`，聚合不受影响
    lookup_timeout_ms: Option<u64>,
    /// 查询成功之后协调调用失败时，是否释放预留
    #[builder(default = true)]
    release_on_failure: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: None,
            release_on_failure: true,
        }
    }
}

impl CoordinatorConfig {
    pub fn lookup_timeout(&self) -> Option<Duration> {
        self.lookup_timeout_ms.map(Duration::from_millis)
    }

    pub fn release_on_failure(&self) -> bool {
        self.release_on_failure
    }
}
