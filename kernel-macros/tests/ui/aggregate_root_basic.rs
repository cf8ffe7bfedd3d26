use kernel_domain::aggregate::{AggregateRoot, EventLedger, HasLedger};
use kernel_domain::identity::Identity;
use kernel_macros::{aggregate_root, domain_event};

#[domain_event]
enum AccountEvent {
    Opened { owner: String },
}

#[aggregate_root(event = AccountEvent)]
struct Account {
    owner: String,
}

impl AggregateRoot for Account {
    const TYPE: &'static str = "account";

    fn apply(&mut self, event: &AccountEvent) {
        match event {
            AccountEvent::Opened { owner } => self.owner = owner.clone(),
        }
    }
}

fn main() {
    let mut account = Account {
        id: Identity::new("a-1").unwrap(),
        ledger: EventLedger::new(),
        owner: String::new(),
    };
    account
        .mutate(|_| Ok(vec![AccountEvent::Opened { owner: "alice".into() }]))
        .unwrap();
    assert_eq!(account.owner, "alice");
    assert_eq!(account.ledger().uncommitted().len(), 1);
}
