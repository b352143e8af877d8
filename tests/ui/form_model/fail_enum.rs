use formbind::form::FormModel;

#[allow(dead_code)]
#[derive(FormModel)]
enum Choice {
    Buy,
    Sell,
}

fn main() {}
