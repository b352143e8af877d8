use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;

use super::controller::{
    FieldEntry, FieldMeta, FormEvent, FormInstance, FormResult, SubscriptionId, ValidationMode,
    read_lock, write_lock,
};
use super::path::FieldPath;
use super::should_update::create_should_update;
use super::store::DepValues;
use super::validation::{ValidatorList, ValidatorRef};
use crate::contracts::{Control, ControlBinding};
use crate::widgets::{ChangeHandler, EventFuture, EventHandler, Node};

pub type ComputedChild = Arc<dyn Fn(&DepValues) -> Node + Send + Sync>;

#[derive(Clone, Default)]
pub enum ItemChild {
    #[default]
    Empty,
    /// Receives the field's value and change/blur handlers.
    Static(Arc<dyn Control>),
    /// Built from the dependency snapshot; nothing is injected.
    Computed(ComputedChild),
}

#[derive(Default)]
struct RenderTracker {
    renders: AtomicUsize,
    updates: AtomicUsize,
    stale: AtomicBool,
    cache: RwLock<Option<Node>>,
    subscription: RwLock<Option<SubscriptionId>>,
}

/// Binds one field (or, without a name, one dependency-driven region) to a
/// form instance.
pub struct FormItem<S> {
    name: Option<FieldPath>,
    label: Option<String>,
    validators: ValidatorList,
    deps: Vec<FieldPath>,
    child: ItemChild,
    no_style: bool,
    required: bool,
    validate_trigger: Option<ValidationMode>,
    debounce: Option<Duration>,
    tracker: Arc<RenderTracker>,
    _model: PhantomData<fn() -> S>,
}

impl<S> Clone for FormItem<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            label: self.label.clone(),
            validators: self.validators.clone(),
            deps: self.deps.clone(),
            child: self.child.clone(),
            no_style: self.no_style,
            required: self.required,
            validate_trigger: self.validate_trigger,
            debounce: self.debounce,
            tracker: Arc::clone(&self.tracker),
            _model: PhantomData,
        }
    }
}

impl<S> Default for FormItem<S> {
    fn default() -> Self {
        Self {
            name: None,
            label: None,
            validators: ValidatorList::default(),
            deps: Vec::new(),
            child: ItemChild::Empty,
            no_style: false,
            required: false,
            validate_trigger: None,
            debounce: None,
            tracker: Arc::new(RenderTracker::default()),
            _model: PhantomData,
        }
    }
}

impl<S: 'static> FormItem<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<FieldPath>) -> Self {
        Self::new().name(name)
    }

    pub fn name(mut self, name: impl Into<FieldPath>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn validators(mut self, validators: Vec<Option<ValidatorRef>>) -> Self {
        self.validators = ValidatorList::Static(validators);
        self
    }

    /// Rules rebuilt from the dependency values on every run.
    pub fn computed_validators(
        mut self,
        build: impl Fn(&DepValues) -> Vec<Option<ValidatorRef>> + Send + Sync + 'static,
    ) -> Self {
        self.validators = ValidatorList::computed(build);
        self
    }

    pub fn deps<I, P>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<FieldPath>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn child(mut self, control: impl Control + 'static) -> Self {
        self.child = ItemChild::Static(Arc::new(control));
        self
    }

    pub fn computed_child(
        mut self,
        build: impl Fn(&DepValues) -> Node + Send + Sync + 'static,
    ) -> Self {
        self.child = ItemChild::Computed(Arc::new(build));
        self
    }

    pub fn no_style(mut self, no_style: bool) -> Self {
        self.no_style = no_style;
        self
    }

    /// Marks the label as required. Validation still comes from the rules.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn validate_trigger(mut self, trigger: ValidationMode) -> Self {
        self.validate_trigger = Some(trigger);
        self
    }

    pub fn debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce = Some(Duration::from_millis(debounce_ms));
        self
    }

    pub fn field_name(&self) -> Option<&FieldPath> {
        self.name.as_ref()
    }

    pub fn dependencies(&self) -> &[FieldPath] {
        &self.deps
    }

    /// Number of times the item actually rendered.
    pub fn render_count(&self) -> usize {
        self.tracker.renders.load(Ordering::SeqCst)
    }

    /// Number of store or meta events that asked this item to re-render.
    pub fn update_count(&self) -> usize {
        self.tracker.updates.load(Ordering::SeqCst)
    }

    pub fn is_stale(&self) -> bool {
        self.tracker.stale.load(Ordering::SeqCst)
    }

    pub fn mount(&self, form: &FormInstance<S>) -> FormResult<()> {
        let computed = self.validators.is_computed() || matches!(self.child, ItemChild::Computed(_));
        if computed && self.deps.is_empty() {
            tracing::warn!(
                field = ?self.name.as_ref().map(ToString::to_string),
                "computed item has no dependencies and will not update"
            );
        }
        if let Some(name) = &self.name {
            form.register_field(FieldEntry {
                path: name.clone(),
                validators: self.validators.clone(),
                deps: self.deps.clone(),
                validate_trigger: self.validate_trigger,
                debounce: self.debounce,
            })?;
        }

        let detector = create_should_update(self.name.iter().chain(self.deps.iter()));
        let own = self.name.clone();
        let tracker = Arc::clone(&self.tracker);
        let id = form.subscribe(move |event| {
            let update = match event {
                FormEvent::ValuesChanged { prev, curr } => detector.changed(prev, curr),
                FormEvent::MetaChanged(path) => own.as_ref() == Some(*path),
            };
            if update {
                tracing::trace!(field = ?own.as_ref().map(ToString::to_string), "item marked for update");
                tracker.updates.fetch_add(1, Ordering::SeqCst);
                tracker.stale.store(true, Ordering::SeqCst);
            }
        })?;

        let previous = write_lock(&self.tracker.subscription, "recording item subscription")?
            .replace(id);
        if let Some(previous) = previous {
            form.unsubscribe(previous)?;
        }
        self.tracker.stale.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn unmount(&self, form: &FormInstance<S>) -> FormResult<()> {
        let subscription = write_lock(&self.tracker.subscription, "clearing item subscription")?
            .take();
        if let Some(id) = subscription {
            form.unsubscribe(id)?;
        }
        if let Some(name) = &self.name {
            form.unregister_field(name)?;
        }
        *write_lock(&self.tracker.cache, "clearing item cache")? = None;
        Ok(())
    }

    /// Returns the last rendered node unless an event marked the item stale.
    pub fn render_cached(&self, form: &FormInstance<S>) -> FormResult<Node> {
        if !self.tracker.stale.swap(false, Ordering::SeqCst) {
            if let Some(node) = read_lock(&self.tracker.cache, "reading item cache")?.clone() {
                return Ok(node);
            }
        }
        let node = self.render(form)?;
        *write_lock(&self.tracker.cache, "caching item node")? = Some(node.clone());
        Ok(node)
    }

    pub fn render(&self, form: &FormInstance<S>) -> FormResult<Node> {
        self.tracker.renders.fetch_add(1, Ordering::SeqCst);
        let control = match &self.child {
            ItemChild::Empty => None,
            ItemChild::Static(control) => Some(match &self.name {
                Some(name) => control.render(Some(&self.binding(form, name)?)),
                None => control.render(None),
            }),
            ItemChild::Computed(build) => Some(build(&form.dep_values(&self.deps)?)),
        };
        if self.no_style {
            return Ok(control.unwrap_or_else(Node::fragment));
        }

        let meta = match &self.name {
            Some(name) => form.field_meta(name)?.unwrap_or_default(),
            None => FieldMeta::default(),
        };
        let mut item = Node::new("form-item")
            .with_attr("touched", meta.touched.to_string())
            .with_attr("validating", meta.validating.to_string());
        if let Some(name) = &self.name {
            item = item.with_attr("name", name.to_string());
        }
        if let Some(label) = &self.label {
            item = item.with_child(
                Node::new("label")
                    .with_attr("required", self.required.to_string())
                    .with_text(label.clone()),
            );
        }
        if let Some(control) = control {
            item = item.with_child(control);
        }
        if let Some(error) = meta.errors.first() {
            item = item
                .with_attr("error", "true")
                .with_child(Node::new("help").with_text(error.message()));
        }
        Ok(item)
    }

    fn binding(&self, form: &FormInstance<S>, name: &FieldPath) -> FormResult<ControlBinding> {
        let value = form.get_field_value(name)?;

        let change_form = form.clone();
        let change_path = name.clone();
        let on_change: ChangeHandler = Arc::new(move |next: Value| -> EventFuture {
            let form = change_form.clone();
            let path = change_path.clone();
            Box::pin(async move {
                if let Err(error) = form.change_field(path.clone(), next).await {
                    tracing::warn!(field = %path, %error, "failed to apply field change");
                }
            })
        });

        let blur_form = form.clone();
        let blur_path = name.clone();
        let on_blur: EventHandler = Arc::new(move || -> EventFuture {
            let form = blur_form.clone();
            let path = blur_path.clone();
            Box::pin(async move {
                if let Err(error) = form.blur_field(path.clone()).await {
                    tracing::warn!(field = %path, %error, "failed to handle field blur");
                }
            })
        });

        Ok(ControlBinding {
            value,
            on_change,
            on_blur,
        })
    }
}
