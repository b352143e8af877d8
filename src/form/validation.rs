use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::path::FieldPath;
use super::store::DepValues;

/// A single validation failure: a message and an optional payload for
/// callers that reject with structured data.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct FieldError {
    message: Arc<str>,
    payload: Option<Value>,
}

impl FieldError {
    pub fn new(message: impl Into<Arc<str>>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    pub fn with_payload(message: impl Into<Arc<str>>, payload: Value) -> Self {
        Self {
            message: message.into(),
            payload: Some(payload),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

impl From<&str> for FieldError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationTrigger {
    Change,
    Blur,
    Dependency,
    Submit,
    Manual,
}

impl Display for ValidationTrigger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ValidationTrigger::Change => "change",
            ValidationTrigger::Blur => "blur",
            ValidationTrigger::Dependency => "dependency",
            ValidationTrigger::Submit => "submit",
            ValidationTrigger::Manual => "manual",
        })
    }
}

/// Context handed to every validator in a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    pub field: FieldPath,
    pub trigger: ValidationTrigger,
}

pub type BoxedValidationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(), FieldError>> + Send + 'a>>;

/// Checks one value. `None` means the field has no value at all, which is
/// distinct from an explicit `null`.
pub trait Validator: Send + Sync {
    fn validate<'a>(
        &'a self,
        rule: &'a Rule,
        value: Option<&'a Value>,
    ) -> BoxedValidationFuture<'a>;
}

impl<F> Validator for F
where
    F: Fn(&Rule, Option<&Value>) -> Result<(), FieldError> + Send + Sync,
{
    fn validate<'a>(
        &'a self,
        rule: &'a Rule,
        value: Option<&'a Value>,
    ) -> BoxedValidationFuture<'a> {
        Box::pin(std::future::ready((self)(rule, value)))
    }
}

pub type ValidatorRef = Arc<dyn Validator>;

struct AsyncFnValidator<F> {
    validate: F,
}

impl<F, Fut> Validator for AsyncFnValidator<F>
where
    F: Fn(Rule, Option<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), FieldError>> + Send + 'static,
{
    fn validate<'a>(
        &'a self,
        rule: &'a Rule,
        value: Option<&'a Value>,
    ) -> BoxedValidationFuture<'a> {
        Box::pin((self.validate)(rule.clone(), value.cloned()))
    }
}

/// Wraps an async closure as a validator. The closure receives owned copies
/// of the rule and value so it may hold them across awaits.
pub fn async_validator<F, Fut>(validate: F) -> ValidatorRef
where
    F: Fn(Rule, Option<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), FieldError>> + Send + 'static,
{
    Arc::new(AsyncFnValidator { validate })
}

struct Composed {
    validators: Vec<ValidatorRef>,
}

impl Validator for Composed {
    fn validate<'a>(
        &'a self,
        rule: &'a Rule,
        value: Option<&'a Value>,
    ) -> BoxedValidationFuture<'a> {
        Box::pin(async move {
            for validator in &self.validators {
                validator.validate(rule, value).await?;
            }
            Ok(())
        })
    }
}

/// Runs the non-`None` validators in order and stops at the first failure,
/// returning it unchanged. An empty list passes.
pub fn compose(validators: Vec<Option<ValidatorRef>>) -> ValidatorRef {
    Arc::new(Composed {
        validators: validators.into_iter().flatten().collect(),
    })
}

/// Builds a `Vec<Option<ValidatorRef>>`. Entries may be validators or
/// `Option`s of validators, so rules can be switched off conditionally.
#[macro_export]
macro_rules! validators {
    () => {
        ::std::vec::Vec::<::std::option::Option<$crate::form::ValidatorRef>>::new()
    };
    ($($validator:expr),+ $(,)?) => {
        ::std::vec![
            $(::std::option::Option::<$crate::form::ValidatorRef>::from($validator)),+
        ]
    };
}

pub type ComputedValidators = Arc<dyn Fn(&DepValues) -> Vec<Option<ValidatorRef>> + Send + Sync>;

/// The rules of one field: a fixed list, or a list derived from the current
/// values of the field's dependencies.
#[derive(Clone)]
pub enum ValidatorList {
    Static(Vec<Option<ValidatorRef>>),
    Computed(ComputedValidators),
}

impl Default for ValidatorList {
    fn default() -> Self {
        Self::Static(Vec::new())
    }
}

impl ValidatorList {
    pub fn computed(
        build: impl Fn(&DepValues) -> Vec<Option<ValidatorRef>> + Send + Sync + 'static,
    ) -> Self {
        Self::Computed(Arc::new(build))
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    pub fn resolve(&self, deps: &DepValues) -> ValidatorRef {
        match self {
            Self::Static(validators) => compose(validators.clone()),
            Self::Computed(build) => compose(build(deps)),
        }
    }
}

impl From<Vec<Option<ValidatorRef>>> for ValidatorList {
    fn from(value: Vec<Option<ValidatorRef>>) -> Self {
        Self::Static(value)
    }
}

/// Typed handle to one field of a model. `path` is the field's location in
/// the serialized store, so it follows serde renames.
pub trait FieldLens<S>: Copy + Send + Sync + 'static {
    type Value: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static;

    fn path(self) -> FieldPath;

    fn get<'a>(self, model: &'a S) -> &'a Self::Value;

    fn set(self, model: &mut S, value: Self::Value);
}

pub trait FormModel: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
}
