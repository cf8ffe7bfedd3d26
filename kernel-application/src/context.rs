use bon::Builder;

/// 应用层上下文（Application Context）
///
/// 承载一次协调调用所需的横切信息：关联追踪 `correlation_id` 与执行者 `actor_id`。
/// 两者都会进入协调调用的 tracing span。
///
/// 典型用法：
/// ```rust
/// use kernel_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123")
///     .actor_id("u-1")
///     .build();
/// assert_eq!(ctx.correlation_id(), Some("cor-123"));
/// ```
#[derive(Builder, Clone, Debug, Default, PartialEq, Eq)]
pub struct AppContext {
    /// 关联 ID，用于将多条日志关联到同一个业务操作
    #[builder(into)]
    correlation_id: Option<String>,
    /// 触发操作的主体 ID
    #[builder(into)]
    actor_id: Option<String>,
}

impl AppContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }
}
