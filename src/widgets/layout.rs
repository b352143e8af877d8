use super::node::{EventHandler, Node};

/// A titled container.
pub fn card(title: impl Into<String>, body: Node) -> Node {
    Node::new("card")
        .with_child(Node::new("card-title").with_text(title))
        .with_child(body)
}

/// Renders nothing while closed. `on_close` backs the dialog's close button.
pub fn dialog(title: impl Into<String>, open: bool, on_close: EventHandler, body: Node) -> Node {
    if !open {
        return Node::fragment();
    }
    Node::new("dialog")
        .with_attr("open", "true")
        .with_child(Node::new("dialog-title").with_text(title))
        .with_child(body)
        .with_child(
            Node::new("button")
                .with_attr("type", "button")
                .with_attr("role", "close")
                .with_text("Close")
                .with_on_click(on_close),
        )
}
