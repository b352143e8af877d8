use formbind::form::FormModel;

#[allow(dead_code)]
#[derive(FormModel)]
struct Credentials(String, String);

fn main() {}
