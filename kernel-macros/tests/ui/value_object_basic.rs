use kernel_domain::error::ValidationError;
use kernel_domain::value_object::ValueObject;
use kernel_macros::value_object;

fn check_email(email: &Email) -> Result<(), ValidationError> {
    if !email.0.contains('@') {
        return Err(ValidationError::new("Email", "value", "missing '@'"));
    }
    Ok(())
}

#[value_object(validate = check_email)]
struct Email(String);

#[value_object(name = "geo.Point", debug = false)]
struct Point {
    x: i32,
    y: i32,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[value_object]
enum Currency {
    Usd,
    Eur,
}

fn main() {
    assert!(Email("a@b.c".into()).validated().is_ok());
    assert!(Email("nope".into()).validated().is_err());
    assert_eq!(<Point as ValueObject>::TYPE, "geo.Point");
    assert_eq!(Point { x: 1, y: 2 }, Point { x: 1, y: 2 });
    assert_ne!(Currency::Usd, Currency::Eur);
}
