use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::controller::{
    FinishFailedHook, FinishHook, FormError, FormHooks, FormInstance, FormResult, SubmitOutcome,
    ValidateErrorInfo, ValuesChangeHook,
};
use super::item::FormItem;
use super::path::FieldPath;
use crate::widgets::{EventFuture, EventHandler, Node};

type TransformInitial = Arc<dyn Fn(Value) -> Value + Send + Sync>;
type BeforeSubmit<S, V> = Arc<dyn Fn(S) -> V + Send + Sync>;
type OnFinish<V> = Arc<dyn Fn(V) + Send + Sync>;

enum FormChild<S> {
    Item(FormItem<S>),
    Node(Node),
}

/// A form bound to one instance. `S` is the store shape; `V` is what
/// `on_finish` receives after the optional `before_submit` transform.
pub struct Form<S, V = S> {
    instance: FormInstance<S>,
    initial_values: Option<Value>,
    transform_initial_values: Option<TransformInitial>,
    before_submit: Option<BeforeSubmit<S, V>>,
    on_finish: Option<OnFinish<V>>,
    on_finish_failed: Option<FinishFailedHook>,
    on_values_change: Option<ValuesChangeHook>,
    children: Vec<FormChild<S>>,
    mounted: bool,
}

impl<S, V> Form<S, V>
where
    S: DeserializeOwned + 'static,
    V: DeserializeOwned + 'static,
{
    pub fn new(instance: FormInstance<S>) -> Self {
        Self {
            instance,
            initial_values: None,
            transform_initial_values: None,
            before_submit: None,
            on_finish: None,
            on_finish_failed: None,
            on_values_change: None,
            children: Vec::new(),
            mounted: false,
        }
    }

    /// Partial values merged into the store when the form mounts. Repeated
    /// calls merge in order.
    pub fn initial_values(mut self, values: impl Serialize) -> FormResult<Self> {
        let values = serde_json::to_value(values)?;
        if !values.is_object() {
            return Err(FormError::NotAnObject);
        }
        let mut merged = self
            .initial_values
            .take()
            .unwrap_or_else(|| Value::Object(Map::new()));
        super::path::merge(&mut merged, values);
        self.initial_values = Some(merged);
        Ok(self)
    }

    pub fn transform_initial_values(
        mut self,
        transform: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.transform_initial_values = Some(Arc::new(transform));
        self
    }

    pub fn before_submit(mut self, transform: impl Fn(S) -> V + Send + Sync + 'static) -> Self {
        self.before_submit = Some(Arc::new(transform));
        self
    }

    pub fn on_finish(mut self, handler: impl Fn(V) + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Arc::new(handler));
        self
    }

    pub fn on_finish_failed(
        mut self,
        handler: impl Fn(&ValidateErrorInfo) + Send + Sync + 'static,
    ) -> Self {
        self.on_finish_failed = Some(Arc::new(handler));
        self
    }

    /// Called after every user change with the changed part of the values and
    /// all values.
    pub fn on_values_change(
        mut self,
        handler: impl Fn(&Value, &Value) + Send + Sync + 'static,
    ) -> Self {
        self.on_values_change = Some(Arc::new(handler));
        self
    }

    pub fn item(mut self, item: FormItem<S>) -> Self {
        self.children.push(FormChild::Item(item));
        self
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(FormChild::Node(node));
        self
    }

    pub fn instance(&self) -> &FormInstance<S> {
        &self.instance
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn items(&self) -> impl Iterator<Item = &FormItem<S>> {
        self.children.iter().filter_map(|child| match child {
            FormChild::Item(item) => Some(item),
            FormChild::Node(_) => None,
        })
    }

    pub fn find_item(&self, name: impl Into<FieldPath>) -> Option<&FormItem<S>> {
        let name = name.into();
        self.items().find(|item| item.field_name() == Some(&name))
    }

    /// Applies initial values, installs the submit hooks and mounts every
    /// item in declaration order.
    pub fn mount(mut self) -> FormResult<Self> {
        if self.mounted {
            return Ok(self);
        }
        let mut initial = self
            .initial_values
            .take()
            .unwrap_or_else(|| Value::Object(Map::new()));
        if let Some(transform) = &self.transform_initial_values {
            initial = transform(initial);
        }
        self.instance.initialize(initial)?;

        let before_submit = self.before_submit.clone();
        let on_finish = self.on_finish.clone();
        let finish: FinishHook = Arc::new(move |values: &Value| -> FormResult<()> {
            let submitted: V = match &before_submit {
                Some(transform) => transform(serde_json::from_value::<S>(values.clone())?),
                None => serde_json::from_value(values.clone())?,
            };
            if let Some(on_finish) = &on_finish {
                on_finish(submitted);
            }
            Ok(())
        });
        self.instance.install_hooks(FormHooks {
            finish: Some(finish),
            finish_failed: self.on_finish_failed.clone(),
            values_change: self.on_values_change.clone(),
        })?;

        for item in self.items() {
            item.mount(&self.instance)?;
        }
        self.mounted = true;
        tracing::debug!(
            form = self.instance.form_id()?.0,
            items = self.items().count(),
            "mounted form"
        );
        Ok(self)
    }

    pub fn unmount(&mut self) -> FormResult<()> {
        if !self.mounted {
            return Ok(());
        }
        for item in self.items() {
            item.unmount(&self.instance)?;
        }
        self.instance.install_hooks(FormHooks::default())?;
        self.mounted = false;
        Ok(())
    }

    /// Renders the form. Items re-render only when an event marked them
    /// stale. Submit buttons without their own click handler submit the form.
    pub fn render(&self) -> FormResult<Node> {
        if !self.mounted {
            return Err(FormError::NotMounted);
        }
        let submit = self.submit_handler();
        let mut nodes = Vec::with_capacity(self.children.len());
        for child in &self.children {
            nodes.push(match child {
                FormChild::Item(item) => item.render_cached(&self.instance)?,
                FormChild::Node(node) => node.clone(),
            });
        }
        let wire = |node: Node| {
            if node.tag() == "button" && node.attr("type") == Some("submit") && !node.has_on_click()
            {
                node.with_on_click(submit.clone())
            } else {
                node
            }
        };
        Ok(Node::new("form")
            .with_children(nodes.into_iter().map(|node| node.map_tree(&wire)))
            .with_on_submit(submit.clone()))
    }

    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        if !self.mounted {
            return Err(FormError::NotMounted);
        }
        self.instance.submit().await
    }

    fn submit_handler(&self) -> EventHandler {
        let instance = self.instance.clone();
        Arc::new(move || -> EventFuture {
            let instance = instance.clone();
            Box::pin(async move {
                match instance.submit().await {
                    Ok(SubmitOutcome::Submitted) => tracing::info!("form submitted"),
                    Ok(SubmitOutcome::Blocked(info)) => {
                        tracing::info!(failed = info.error_fields.len(), "form submit blocked")
                    }
                    Err(error) => tracing::warn!(%error, "form submit failed"),
                }
            })
        })
    }
}
