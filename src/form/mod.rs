mod container;
mod controller;
mod create;
mod item;
mod path;
mod should_update;
mod store;
mod validation;
pub mod validators;

#[cfg(test)]
mod tests;

pub use container::Form;
pub use controller::{
    ConfigError, FieldData, FieldEntry, FieldErrors, FieldMeta, FieldObserver, FormError,
    FormEvent, FormId, FormInstance, FormOptions, FormResult, FormSnapshot, RevalidateMode,
    SubmitOutcome, SubmitState, SubscriptionId, ValidateErrorInfo, ValidationMode,
    ValidationTicket,
};
pub use create::{FormKit, ItemDefaults, create_form, create_form_with};
pub use formbind_derive::FormModel;
pub use item::{ComputedChild, FormItem, ItemChild};
pub use path::{FieldPath, PathSegment, resolve};
pub use should_update::{ShouldUpdate, create_should_update};
pub use store::{DepValues, Store};
pub use validation::{
    BoxedValidationFuture, ComputedValidators, FieldError, FieldLens, FormModel, Rule,
    ValidationTrigger, Validator, ValidatorList, ValidatorRef, async_validator, compose,
};
