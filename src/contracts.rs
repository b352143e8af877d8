use serde_json::Value;

use crate::widgets::{ChangeHandler, EventHandler, Node};

/// What a form item injects into the control it wraps.
#[derive(Clone)]
pub struct ControlBinding {
    pub value: Option<Value>,
    pub on_change: ChangeHandler,
    pub on_blur: EventHandler,
}

/// A renderable input. Unbound controls render their own props; a bound
/// control takes its value and handlers from the binding instead.
pub trait Control: Send + Sync {
    fn render(&self, binding: Option<&ControlBinding>) -> Node;
}

impl Control for Node {
    fn render(&self, binding: Option<&ControlBinding>) -> Node {
        let node = self.clone();
        match binding {
            Some(binding) => node
                .with_value(binding.value.clone().unwrap_or(Value::Null))
                .with_on_change(binding.on_change.clone())
                .with_on_blur(binding.on_blur.clone()),
            None => node,
        }
    }
}

pub trait Disableable: Sized {
    fn disabled(self, value: bool) -> Self;
}

#[macro_export]
macro_rules! impl_disableable {
    ($type:ty) => {
        impl $crate::contracts::Disableable for $type {
            fn disabled(mut self, value: bool) -> Self {
                self.disabled = value;
                self
            }
        }
    };
}
