use kernel_domain::entity::Entity;
use kernel_domain::identity::Identity;
use kernel_macros::entity;

#[entity]
struct Member {
    name: String,
}

#[entity(debug = false)]
struct Team {
    id: Identity<Team>,
    members: Vec<Member>,
}

fn main() {
    let id = Identity::<Member>::new("m-1").unwrap();
    let a = Member { id: id.clone(), name: "a".into() };
    let b = Member { id, name: "b".into() };
    assert_eq!(a, b);
    assert!(a.same_identity_as(&b));

    let team = Team {
        id: Identity::generate(),
        members: vec![a.clone()],
    };
    assert_eq!(team.members.len(), 1);
    assert!(!team.id().as_str().is_empty());
}
