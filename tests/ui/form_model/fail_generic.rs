use formbind::form::FormModel;

#[allow(dead_code)]
#[derive(FormModel)]
struct Wrapper<T> {
    value: T,
}

fn main() {}
