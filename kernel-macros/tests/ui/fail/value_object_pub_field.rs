use kernel_macros::value_object;

#[value_object]
struct Username {
    pub value: String,
    locale: String,
}

fn main() {}
