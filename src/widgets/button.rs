use crate::contracts::{Control, ControlBinding};
use crate::impl_disableable;

use super::node::{EventHandler, Node, event_handler};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ButtonType {
    #[default]
    Button,
    Submit,
}

#[derive(Clone, Default)]
pub struct Button {
    label: String,
    button_type: ButtonType,
    disabled: bool,
    on_click: Option<EventHandler>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// A button that submits the enclosing form when clicked.
    pub fn submit(label: impl Into<String>) -> Self {
        Self {
            button_type: ButtonType::Submit,
            ..Self::new(label)
        }
    }

    pub fn on_click(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(event_handler(handler));
        self
    }

    pub fn on_click_async(mut self, handler: EventHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    pub fn to_node(&self) -> Node {
        self.render(None)
    }
}

impl_disableable!(Button);

impl Control for Button {
    fn render(&self, _binding: Option<&ControlBinding>) -> Node {
        let mut node = Node::new("button")
            .with_attr(
                "type",
                match self.button_type {
                    ButtonType::Button => "button",
                    ButtonType::Submit => "submit",
                },
            )
            .with_text(self.label.clone());
        if self.disabled {
            node = node.with_attr("disabled", "true");
        }
        match &self.on_click {
            Some(handler) if !self.disabled => node.with_on_click(handler.clone()),
            _ => node,
        }
    }
}
