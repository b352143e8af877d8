use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::container::Form;
use super::controller::{FormInstance, FormOptions, ValidationMode};
use super::item::FormItem;
use super::path::FieldPath;

/// Settings applied to every item a [`FormKit`] creates.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ItemDefaults {
    pub validate_trigger: Option<ValidationMode>,
    pub debounce_ms: Option<u64>,
    pub no_style: bool,
}

/// Factory for instances, forms and items that share a model type and the
/// same item defaults.
pub struct FormKit<S, V = S> {
    defaults: ItemDefaults,
    options: FormOptions,
    _types: PhantomData<fn() -> (S, V)>,
}

impl<S, V> Clone for FormKit<S, V> {
    fn clone(&self) -> Self {
        Self {
            defaults: self.defaults,
            options: self.options,
            _types: PhantomData,
        }
    }
}

pub fn create_form<S>() -> FormKit<S>
where
    S: DeserializeOwned + 'static,
{
    create_form_with(ItemDefaults::default())
}

pub fn create_form_with<S, V>(defaults: ItemDefaults) -> FormKit<S, V>
where
    S: DeserializeOwned + 'static,
    V: DeserializeOwned + 'static,
{
    FormKit {
        defaults,
        options: FormOptions::default(),
        _types: PhantomData,
    }
}

impl<S, V> FormKit<S, V>
where
    S: DeserializeOwned + 'static,
    V: DeserializeOwned + 'static,
{
    /// Options for instances created by [`use_form`](Self::use_form).
    pub fn with_options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    pub fn defaults(&self) -> ItemDefaults {
        self.defaults
    }

    pub fn use_form(&self) -> FormInstance<S> {
        FormInstance::new(self.options)
    }

    pub fn form(&self, instance: FormInstance<S>) -> Form<S, V> {
        Form::new(instance)
    }

    pub fn item(&self, name: impl Into<FieldPath>) -> FormItem<S> {
        self.apply(FormItem::named(name))
    }

    /// An item without a value of its own, for regions that follow other
    /// fields through `deps`.
    pub fn observer_item(&self) -> FormItem<S> {
        self.apply(FormItem::new())
    }

    fn apply(&self, mut item: FormItem<S>) -> FormItem<S> {
        if let Some(trigger) = self.defaults.validate_trigger {
            item = item.validate_trigger(trigger);
        }
        if let Some(debounce_ms) = self.defaults.debounce_ms {
            item = item.debounce_ms(debounce_ms);
        }
        item.no_style(self.defaults.no_style)
    }
}
