use kernel_domain::domain_event::DomainEvent;
use kernel_macros::domain_event;

#[domain_event(version = 3)]
enum OrderEvent {
    Placed { order_id: String },
    #[event(event_type = "order.shipped", event_version = 5)]
    Shipped(String),
    Cancelled,
}

#[domain_event]
enum NoEvents {}

fn main() {
    let placed = OrderEvent::Placed { order_id: "o-1".into() };
    assert_eq!(placed.event_type(), "OrderEvent.Placed");
    assert_eq!(placed.event_version(), 3);

    let shipped = OrderEvent::Shipped("o-1".into());
    assert_eq!(shipped.event_type(), "order.shipped");
    assert_eq!(shipped.event_version(), 5);

    assert_eq!(OrderEvent::Cancelled.event_version(), 3);

    let json = serde_json::to_string(&placed).unwrap();
    let back: OrderEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, placed);

    let _ = std::mem::size_of::<NoEvents>();
}
