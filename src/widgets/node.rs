use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

pub type EventFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub type ChangeHandler = Arc<dyn Fn(Value) -> EventFuture + Send + Sync>;
pub type EventHandler = Arc<dyn Fn() -> EventFuture + Send + Sync>;

/// Wraps a plain closure as a change handler.
pub fn change_handler(handler: impl Fn(Value) + Send + Sync + 'static) -> ChangeHandler {
    Arc::new(move |value| -> EventFuture {
        handler(value);
        Box::pin(std::future::ready(()))
    })
}

pub fn event_handler(handler: impl Fn() + Send + Sync + 'static) -> EventHandler {
    Arc::new(move || -> EventFuture {
        handler();
        Box::pin(std::future::ready(()))
    })
}

/// One element of a rendered tree. Handlers are async so an event can drive
/// validation to completion before the caller inspects the next render.
#[derive(Clone, Default)]
pub struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    value: Option<Value>,
    on_change: Option<ChangeHandler>,
    on_blur: Option<EventHandler>,
    on_click: Option<EventHandler>,
    on_submit: Option<EventHandler>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// A node that renders only its children.
    pub fn fragment() -> Self {
        Self::new("fragment")
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_on_change(mut self, handler: ChangeHandler) -> Self {
        self.on_change = Some(handler);
        self
    }

    pub fn with_on_blur(mut self, handler: EventHandler) -> Self {
        self.on_blur = Some(handler);
        self
    }

    pub fn with_on_click(mut self, handler: EventHandler) -> Self {
        self.on_click = Some(handler);
        self
    }

    pub fn with_on_submit(mut self, handler: EventHandler) -> Self {
        self.on_submit = Some(handler);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn has_on_change(&self) -> bool {
        self.on_change.is_some()
    }

    pub fn has_on_click(&self) -> bool {
        self.on_click.is_some()
    }

    /// Own text followed by the text of every descendant.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Depth-first search including this node.
    pub fn find(&self, predicate: &impl Fn(&Node) -> bool) -> Option<&Node> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }

    pub fn find_all<'a>(&'a self, predicate: &impl Fn(&Node) -> bool) -> Vec<&'a Node> {
        let mut found = Vec::new();
        self.collect_matching(predicate, &mut found);
        found
    }

    fn collect_matching<'a>(&'a self, predicate: &impl Fn(&Node) -> bool, found: &mut Vec<&'a Node>) {
        if predicate(self) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_matching(predicate, found);
        }
    }

    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<&Node> {
        self.find(&|node: &Node| node.attr(name) == Some(value))
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Node> {
        self.find(&|node: &Node| node.tag == tag)
    }

    /// Rebuilds the tree bottom-up through `map`.
    pub fn map_tree(self, map: &impl Fn(Node) -> Node) -> Node {
        let mut node = self;
        node.children = std::mem::take(&mut node.children)
            .into_iter()
            .map(|child| child.map_tree(map))
            .collect();
        map(node)
    }

    /// Simulates user input. Returns `false` when the node has no change
    /// handler.
    pub async fn input(&self, value: impl Into<Value>) -> bool {
        match &self.on_change {
            Some(handler) => {
                handler(value.into()).await;
                true
            }
            None => false,
        }
    }

    pub async fn blur(&self) -> bool {
        fire(self.on_blur.as_ref()).await
    }

    pub async fn click(&self) -> bool {
        fire(self.on_click.as_ref()).await
    }

    pub async fn submit(&self) -> bool {
        fire(self.on_submit.as_ref()).await
    }
}

async fn fire(handler: Option<&EventHandler>) -> bool {
    match handler {
        Some(handler) => {
            handler().await;
            true
        }
        None => false,
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut handlers = Vec::new();
        for (name, present) in [
            ("change", self.on_change.is_some()),
            ("blur", self.on_blur.is_some()),
            ("click", self.on_click.is_some()),
            ("submit", self.on_submit.is_some()),
        ] {
            if present {
                handlers.push(name);
            }
        }
        f.debug_struct("Node")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("text", &self.text)
            .field("value", &self.value)
            .field("handlers", &handlers)
            .field("children", &self.children)
            .finish()
    }
}
