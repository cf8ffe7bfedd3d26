//! 唯一性协调器
//!
//! 在聚合之外编排“查询唯一性 -> 调用聚合操作 -> 收集事件 -> 提交”：
//!
//! 1. 预演操作：聚合自身的规则（例如禁用词）在任何 I/O 之前拒绝；
//! 2. 查询唯一性：不可用则原样返回，已存在则返回 `AlreadyTaken`，两者都不触碰聚合；
//! 3. 调用聚合操作：聚合重新校验自己的规则与不变量；
//! 4. 成功后取出事件并交给仓储；提交失败会被报告，内存中的聚合保留变更后的状态；
//! 5. 聚合失败原样返回，不尝试提交。
//!
//! 查询成功之后的任何失败都会释放预留（可配置）。
//!
use kernel_domain::aggregate::AggregateRoot;
use kernel_domain::domain_event::EventEnvelope;
use kernel_domain::error::DomainResult;
use kernel_domain::identity::Identity;
use kernel_domain::persist::AggregateRepository;
use kernel_domain::uniqueness::{UnavailableError, UniquenessChecker, UniquenessClaim};
use kernel_domain::value_object::Version;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::CoordinatorConfig;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

/// 一次成功协调调用的结果摘要
#[derive(Debug, Clone)]
pub struct CommitReceipt<A>
where
    A: AggregateRoot,
{
    aggregate_id: Identity<A>,
    version: Version,
    events: Vec<EventEnvelope<A>>,
}

impl<A> CommitReceipt<A>
where
    A: AggregateRoot,
{
    pub fn aggregate_id(&self) -> &Identity<A> {
        &self.aggregate_id
    }

    /// 提交后的聚合版本
    pub fn version(&self) -> Version {
        self.version
    }

    /// 已提交的事件，按产生顺序
    pub fn events(&self) -> &[EventEnvelope<A>] {
        &self.events
    }

    pub fn into_events(self) -> Vec<EventEnvelope<A>> {
        self.events
    }
}

pub struct UniqueValueCoordinator<U, R> {
    checker: U,
    repository: R,
    config: CoordinatorConfig,
}

impl<U, R> UniqueValueCoordinator<U, R>
where
    U: UniquenessChecker,
{
    pub fn new(checker: U, repository: R, config: CoordinatorConfig) -> Self {
        Self {
            checker,
            repository,
            config,
        }
    }

    pub fn checker(&self) -> &U {
        &self.checker
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// 声明唯一值并执行依赖它的聚合操作
    ///
    /// `operation` 会被调用两次：一次预演、一次真正变更，因此必须是纯函数。
    pub async fn claim<A, F>(
        &self,
        ctx: &AppContext,
        aggregate: &mut A,
        claim: UniquenessClaim,
        operation: F,
    ) -> AppResult<CommitReceipt<A>>
    where
        A: AggregateRoot,
        R: AggregateRepository<A>,
        F: Fn(&A) -> DomainResult<Vec<A::Event>>,
    {
        let span = info_span!(
            "claim_unique_value",
            correlation_id = ctx.correlation_id(),
            actor_id = ctx.actor_id(),
            aggregate_type = A::TYPE,
            aggregate_id = %aggregate.id(),
            claim = %claim,
        );

        self.claim_in_span(aggregate, claim, operation)
            .instrument(span)
            .await
    }

    /// 执行不涉及唯一性约束的聚合操作
    pub async fn execute<A, F>(
        &self,
        ctx: &AppContext,
        aggregate: &mut A,
        operation: F,
    ) -> AppResult<CommitReceipt<A>>
    where
        A: AggregateRoot,
        R: AggregateRepository<A>,
        F: Fn(&A) -> DomainResult<Vec<A::Event>>,
    {
        let span = info_span!(
            "execute",
            correlation_id = ctx.correlation_id(),
            actor_id = ctx.actor_id(),
            aggregate_type = A::TYPE,
            aggregate_id = %aggregate.id(),
        );

        self.mutate_and_commit(aggregate, &operation)
            .instrument(span)
            .await
    }

    async fn claim_in_span<A, F>(
        &self,
        aggregate: &mut A,
        claim: UniquenessClaim,
        operation: F,
    ) -> AppResult<CommitReceipt<A>>
    where
        A: AggregateRoot,
        R: AggregateRepository<A>,
        F: Fn(&A) -> DomainResult<Vec<A::Event>>,
    {
        aggregate.preview(&operation).inspect_err(|err| {
            info!(error = %err, "rejected before lookup");
        })?;

        if self.lookup(&claim).await? {
            info!("value already taken");
            return Err(AppError::already_taken(&claim));
        }

        let result = self.mutate_and_commit(aggregate, &operation).await;
        if result.is_err() && self.config.release_on_failure() {
            self.release(&claim).await;
        }
        result
    }

    async fn lookup(&self, claim: &UniquenessClaim) -> AppResult<bool> {
        let lookup = self.checker.exists(claim);
        let answer = match self.config.lookup_timeout() {
            Some(limit) => tokio::time::timeout(limit, lookup)
                .await
                .unwrap_or_else(|_| {
                    Err(UnavailableError::new(format!(
                        "lookup timed out after {}ms",
                        limit.as_millis()
                    )))
                }),
            None => lookup.await,
        };

        let taken = answer.inspect_err(|err| warn!(error = %err, "uniqueness lookup failed"))?;
        debug!(taken, "uniqueness lookup answered");
        Ok(taken)
    }

    async fn mutate_and_commit<A, F>(
        &self,
        aggregate: &mut A,
        operation: F,
    ) -> AppResult<CommitReceipt<A>>
    where
        A: AggregateRoot,
        R: AggregateRepository<A>,
        F: Fn(&A) -> DomainResult<Vec<A::Event>>,
    {
        let expected_version = aggregate.version();
        let version = aggregate.mutate(operation).inspect_err(|err| {
            info!(error = %err, "aggregate rejected operation");
        })?;

        let events = aggregate.pull_uncommitted_events();
        debug!(%version, events = events.len(), "aggregate mutated");

        self.repository
            .commit(aggregate.id(), expected_version, &events)
            .await
            .inspect_err(|err| warn!(error = %err, "commit failed"))?;

        info!(%version, "committed");
        Ok(CommitReceipt {
            aggregate_id: aggregate.id().clone(),
            version,
            events,
        })
    }

    async fn release(&self, claim: &UniquenessClaim) {
        match self.checker.release(claim).await {
            Ok(()) => debug!("reservation released"),
            Err(err) => warn!(error = %err, "failed to release reservation"),
        }
    }
}
