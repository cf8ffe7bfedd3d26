//! 用户名唯一性协调示例
//!
//! 运行：`RUST_LOG=debug cargo run -p kernel-application --example claim_username`
use anyhow::Result as AnyResult;
use kernel_application::config::CoordinatorConfig;
use kernel_application::context::AppContext;
use kernel_application::observability;
use kernel_application::{InMemoryAggregateRepository, InMemoryUniquenessIndex, UniqueValueCoordinator};
use kernel_domain::aggregate::{AggregateRoot, EventLedger};
use kernel_domain::domain_event::DomainEvent;
use kernel_domain::error::{DomainError, DomainResult, ValidationError};
use kernel_domain::identity::Identity;
use kernel_domain::uniqueness::UniquenessClaim;
use kernel_domain::value_object::ValueObject;
use kernel_macros::{aggregate_root, domain_event, value_object};

const BANNED_TERMS: &[&str] = &["admin", "root"];

fn check_username(username: &Username) -> Result<(), ValidationError> {
    let len = username.0.chars().count();
    if !(3..=32).contains(&len) {
        return Err(ValidationError::new("Username", "value", "length must be 3..=32"));
    }
    if !username.0.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return Err(ValidationError::new("Username", "value", "lowercase letters and digits only"));
    }
    Ok(())
}

#[value_object(validate = check_username)]
struct Username(String);

impl Username {
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self(raw.to_string()).validated()
    }
}

#[domain_event]
enum UserEvent {
    #[event(event_type = "UsernameSet")]
    UsernameSet { username: String },
}

#[aggregate_root(event = UserEvent)]
struct User {
    username: Option<Username>,
}

impl User {
    fn register(id: &str) -> DomainResult<Self> {
        Ok(Self {
            id: Identity::new(id)?,
            ledger: EventLedger::new(),
            username: None,
        })
    }

    fn set_username(&self, candidate: &Username) -> DomainResult<Vec<UserEvent>> {
        if BANNED_TERMS.contains(&candidate.0.as_str()) {
            return Err(DomainError::rule("banned_term", format!("'{}' is reserved", candidate.0)));
        }
        Ok(vec![UserEvent::UsernameSet {
            username: candidate.0.clone(),
        }])
    }
}

impl AggregateRoot for User {
    const TYPE: &'static str = "user";

    fn apply(&mut self, event: &UserEvent) {
        match event {
            UserEvent::UsernameSet { username } => self.username = Some(Username(username.clone())),
        }
    }
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    observability::init();

    let coordinator = UniqueValueCoordinator::new(
        InMemoryUniquenessIndex::new(),
        InMemoryAggregateRepository::new(),
        CoordinatorConfig::builder().lookup_timeout_ms(500).build(),
    );
    let ctx = AppContext::builder()
        .correlation_id("demo-1")
        .actor_id("operator")
        .build();

    let mut users = [User::register("u-1")?, User::register("u-2")?];

    for (idx, raw) in [(0, "alice"), (1, "alice"), (1, "admin"), (1, "bob")] {
        let user = &mut users[idx];
        let candidate = Username::parse(raw)?;
        let claim = UniquenessClaim::new("users", "username", &candidate)?;
        match coordinator
            .claim(&ctx, &mut *user, claim, |u: &User| u.set_username(&candidate))
            .await
        {
            Ok(receipt) => {
                for event in receipt.events() {
                    println!(
                        "{} -> {} {:?} @ {}",
                        receipt.aggregate_id(),
                        event.payload().event_type(),
                        event.payload(),
                        receipt.version()
                    );
                }
            }
            Err(err) => println!("{} rejected ({:?}): {err}", user.id, err.kind()),
        }
    }

    for user in &users {
        println!(
            "{}: username={:?}, stored version={}",
            user.id,
            user.username.as_ref().map(|u| u.0.as_str()),
            coordinator.repository().stream_version(&user.id)
        );
    }
    Ok(())
}
