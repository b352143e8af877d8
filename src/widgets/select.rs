use serde_json::Value;

use crate::contracts::{Control, ControlBinding};
use crate::impl_disableable;

use super::input::text_of;
use super::node::Node;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Renders `option` children under a `tag` node; the option whose value
/// matches the current one is marked.
fn render_choices(
    tag: &str,
    option_tag: &str,
    options: &[SelectOption],
    value: Value,
    disabled: bool,
    binding: Option<&ControlBinding>,
) -> Node {
    let current = text_of(&value);
    let mut node = Node::new(tag)
        .with_attr("value", current.clone())
        .with_value(value)
        .with_children(options.iter().map(|option| {
            Node::new(option_tag)
                .with_attr("value", option.value.clone())
                .with_attr("selected", (option.value == current).to_string())
                .with_text(option.label.clone())
        }));
    if disabled {
        node = node.with_attr("disabled", "true");
    }
    match binding {
        Some(binding) => node
            .with_on_change(binding.on_change.clone())
            .with_on_blur(binding.on_blur.clone()),
        None => node,
    }
}

#[derive(Clone, Debug, Default)]
pub struct Select {
    options: Vec<SelectOption>,
    value: Option<String>,
    disabled: bool,
}

impl Select {
    pub fn new(options: impl IntoIterator<Item = SelectOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }
}

impl_disableable!(Select);

impl Control for Select {
    fn render(&self, binding: Option<&ControlBinding>) -> Node {
        let value = match binding {
            Some(binding) => binding.value.clone().unwrap_or(Value::Null),
            None => self.value.clone().map(Value::String).unwrap_or(Value::Null),
        };
        render_choices("select", "option", &self.options, value, self.disabled, binding)
    }
}

#[derive(Clone, Debug, Default)]
pub struct RadioGroup {
    options: Vec<SelectOption>,
    value: Option<String>,
    disabled: bool,
}

impl RadioGroup {
    pub fn new(options: impl IntoIterator<Item = SelectOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl_disableable!(RadioGroup);

impl Control for RadioGroup {
    fn render(&self, binding: Option<&ControlBinding>) -> Node {
        let value = match binding {
            Some(binding) => binding.value.clone().unwrap_or(Value::Null),
            None => self.value.clone().map(Value::String).unwrap_or(Value::Null),
        };
        render_choices("radio-group", "radio", &self.options, value, self.disabled, binding)
    }
}
