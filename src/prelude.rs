pub use crate::contracts::{Control, ControlBinding, Disableable};
pub use crate::form::{
    DepValues, FieldError, FieldLens, FieldPath, Form, FormError, FormEvent, FormInstance,
    FormItem, FormKit, FormModel, FormOptions, FormResult, ItemDefaults, RevalidateMode, Rule,
    SubmitOutcome, SubmitState, ValidationMode, Validator, ValidatorRef, async_validator,
    compose, create_form, create_form_with, validators,
};
pub use crate::widgets::{
    Button, ButtonType, Checkbox, Disclosure, InputKind, Node, RadioGroup, Select, SelectOption,
    TextInput, card, dialog,
};
pub use crate::{field_path, validators};
