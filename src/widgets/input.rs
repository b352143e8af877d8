use serde_json::Value;

use crate::contracts::{Control, ControlBinding};
use crate::impl_disableable;

use super::node::{ChangeHandler, Node, change_handler};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InputKind {
    #[default]
    Text,
    Password,
}

impl InputKind {
    fn as_str(self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Password => "password",
        }
    }
}

#[derive(Clone, Default)]
pub struct TextInput {
    kind: InputKind,
    placeholder: Option<String>,
    value: Option<String>,
    disabled: bool,
    on_change: Option<ChangeHandler>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn password() -> Self {
        Self {
            kind: InputKind::Password,
            ..Self::default()
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn on_change(mut self, handler: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.on_change = Some(change_handler(move |value| {
            handler(text_of(&value));
        }));
        self
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }
}

impl_disableable!(TextInput);

/// Text shown for a stored value. Missing and `null` render empty.
pub(crate) fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl Control for TextInput {
    fn render(&self, binding: Option<&ControlBinding>) -> Node {
        let mut node = Node::new("input").with_attr("type", self.kind.as_str());
        if let Some(placeholder) = &self.placeholder {
            node = node.with_attr("placeholder", placeholder.clone());
        }
        if self.disabled {
            node = node.with_attr("disabled", "true");
        }
        let (value, on_change, on_blur) = match binding {
            Some(binding) => (
                binding.value.clone().unwrap_or(Value::Null),
                Some(binding.on_change.clone()),
                Some(binding.on_blur.clone()),
            ),
            None => (
                self.value.clone().map(Value::String).unwrap_or(Value::Null),
                self.on_change.clone(),
                None,
            ),
        };
        node = node
            .with_attr("value", text_of(&value))
            .with_value(value);
        if let Some(handler) = on_change {
            node = node.with_on_change(handler);
        }
        if let Some(handler) = on_blur {
            node = node.with_on_blur(handler);
        }
        node
    }
}
