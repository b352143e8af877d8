use serde_json::Value;

use crate::contracts::{Control, ControlBinding};
use crate::impl_disableable;

use super::node::{ChangeHandler, Node, change_handler};

/// A checkbox binds the `checked` prop: its form value is a bool.
#[derive(Clone, Default)]
pub struct Checkbox {
    label: String,
    checked: bool,
    disabled: bool,
    on_change: Option<ChangeHandler>,
}

impl Checkbox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn on_change(mut self, handler: impl Fn(bool) + Send + Sync + 'static) -> Self {
        self.on_change = Some(change_handler(move |value| {
            handler(value.as_bool().unwrap_or(false));
        }));
        self
    }
}

impl_disableable!(Checkbox);

impl Control for Checkbox {
    fn render(&self, binding: Option<&ControlBinding>) -> Node {
        let checked = match binding {
            Some(binding) => binding
                .value
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false),
            None => self.checked,
        };
        let mut node = Node::new("checkbox")
            .with_attr("checked", checked.to_string())
            .with_text(self.label.clone())
            .with_value(Value::Bool(checked));
        if self.disabled {
            node = node.with_attr("disabled", "true");
        }
        match binding {
            Some(binding) => node
                .with_on_change(binding.on_change.clone())
                .with_on_blur(binding.on_blur.clone()),
            None => match &self.on_change {
                Some(handler) => node.with_on_change(handler.clone()),
                None => node,
            },
        }
    }
}
