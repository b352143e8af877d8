use formbind::form::{FieldLens, FieldPath, FormModel};
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, formbind::form::FormModel)]
#[serde(rename_all = "camelCase")]
struct ModifyPassword {
    old_password: String,
    #[serde(rename = "pwd")]
    new_password: String,
    #[serde(skip)]
    scratch: u32,
}

fn main() {
    let fields = ModifyPassword::fields();
    let mut model = ModifyPassword {
        old_password: "before".to_string(),
        new_password: String::new(),
        scratch: 0,
    };
    fields.new_password().set(&mut model, "after".to_string());
    assert_eq!(fields.old_password().path(), FieldPath::key("oldPassword"));
    assert_eq!(fields.new_password().path(), FieldPath::key("pwd"));
    assert_eq!(fields.new_password().get(&model), "after");
    assert_eq!(model.scratch, 0);
}
