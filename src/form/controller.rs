use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use futures::future::join_all;
use futures_timer::Delay;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::path::{self, FieldPath};
use super::store::{DepValues, Store};
use super::validation::{FieldError, FieldLens, Rule, ValidationTrigger, ValidatorList};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);
static SUBSCRIPTION_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(SUBSCRIPTION_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

/// Identity of one validation run. Tickets are unique for the lifetime of a
/// form, so a run started before a reset can never match a later one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ValidationTicket(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevalidateMode {
    OnChange,
    OnBlur,
    OnSubmit,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    /// When a field validates itself. Items may override it.
    pub validate_trigger: ValidationMode,
    /// When fields that depend on a changed field are validated again.
    pub revalidate_dependents: RevalidateMode,
    pub validate_debounce_ms: u64,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_trigger: ValidationMode::OnChange,
            revalidate_dependents: RevalidateMode::OnChange,
            validate_debounce_ms: 0,
        }
    }
}

impl FormOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate_debounce(&self) -> Duration {
        Duration::from_millis(self.validate_debounce_ms)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read form options from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid form options: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldMeta {
    pub touched: bool,
    pub validating: bool,
    pub dirty: bool,
    pub errors: Vec<FieldError>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldErrors {
    pub name: FieldPath,
    pub errors: Vec<FieldError>,
}

/// Payload of a failed `validate_fields` or submit.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidateErrorInfo {
    pub values: Value,
    pub error_fields: Vec<FieldErrors>,
    /// Set when a newer run superseded one of the runs being awaited.
    pub out_of_date: bool,
}

/// One entry for [`FormInstance::set_fields`]. Unset parts are left alone.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldData {
    pub name: FieldPath,
    pub value: Option<Value>,
    pub touched: Option<bool>,
    pub validating: Option<bool>,
    pub errors: Option<Vec<FieldError>>,
}

impl FieldData {
    pub fn new(name: impl Into<FieldPath>) -> Self {
        Self {
            name: name.into(),
            value: None,
            touched: None,
            validating: None,
            errors: None,
        }
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn touched(mut self, touched: bool) -> Self {
        self.touched = Some(touched);
        self
    }

    pub fn validating(mut self, validating: bool) -> Self {
        self.validating = Some(validating);
        self
    }

    pub fn errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot {
    pub values: Value,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldPath, FieldMeta>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Submitted,
    Blocked(ValidateErrorInfo),
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    #[error("form submit is already in progress")]
    AlreadySubmitting,
    #[error("validation failed for {} field(s)", .0.error_fields.len())]
    ValidationFailed(ValidateErrorInfo),
    #[error("failed to convert form values: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("partial values must serialize to an object")]
    NotAnObject,
    #[error("form is not mounted")]
    NotMounted,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type FormResult<T> = Result<T, FormError>;

/// Registration record of a mounted field.
#[derive(Clone, Default)]
pub struct FieldEntry {
    pub path: FieldPath,
    pub validators: ValidatorList,
    pub deps: Vec<FieldPath>,
    pub validate_trigger: Option<ValidationMode>,
    pub debounce: Option<Duration>,
}

impl FieldEntry {
    pub fn new(path: impl Into<FieldPath>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn validators(mut self, validators: impl Into<ValidatorList>) -> Self {
        self.validators = validators.into();
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

    pub fn validate_trigger(mut self, trigger: ValidationMode) -> Self {
        self.validate_trigger = Some(trigger);
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = Some(debounce);
        self
    }
}

pub enum FormEvent<'a> {
    ValuesChanged { prev: &'a Value, curr: &'a Value },
    MetaChanged(&'a FieldPath),
}

pub type FieldObserver = Arc<dyn Fn(&FormEvent<'_>) + Send + Sync>;

pub(super) type FinishHook = Arc<dyn Fn(&Value) -> FormResult<()> + Send + Sync>;
pub(super) type FinishFailedHook = Arc<dyn Fn(&ValidateErrorInfo) + Send + Sync>;
pub(super) type ValuesChangeHook = Arc<dyn Fn(&Value, &Value) + Send + Sync>;

#[derive(Clone, Default)]
pub(super) struct FormHooks {
    pub(super) finish: Option<FinishHook>,
    pub(super) finish_failed: Option<FinishFailedHook>,
    pub(super) values_change: Option<ValuesChangeHook>,
}

pub(super) enum ValidationOutcome {
    Passed,
    Failed(FieldError),
    Superseded,
}

pub(super) struct FormState {
    pub(super) id: FormId,
    pub(super) initial: Store,
    pub(super) store: Store,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) field_meta: BTreeMap<FieldPath, FieldMeta>,
    pub(super) tickets: BTreeMap<FieldPath, ValidationTicket>,
    pub(super) next_ticket: u64,
    pub(super) validated: BTreeSet<FieldPath>,
}

impl FormState {
    pub(super) fn ensure_meta(&mut self, path: &FieldPath) -> &mut FieldMeta {
        self.field_meta.entry(path.clone()).or_default()
    }

    fn issue_ticket(&mut self, path: &FieldPath) -> ValidationTicket {
        self.next_ticket += 1;
        let ticket = ValidationTicket(self.next_ticket);
        self.tickets.insert(path.clone(), ticket);
        ticket
    }

    fn refresh_dirty(&mut self) {
        let Self {
            initial,
            store,
            field_meta,
            ..
        } = self;
        for (path, meta) in field_meta.iter_mut() {
            meta.dirty = store.get(path) != initial.get(path);
        }
    }
}

/// Handle to one form's store and field state. Clones share the same form.
pub struct FormInstance<S> {
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState>>,
    pub(super) fields: Arc<RwLock<Vec<FieldEntry>>>,
    pub(super) observers: Arc<RwLock<BTreeMap<SubscriptionId, FieldObserver>>>,
    pub(super) hooks: Arc<RwLock<FormHooks>>,
    _model: PhantomData<fn() -> S>,
}

impl<S> Clone for FormInstance<S> {
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            state: Arc::clone(&self.state),
            fields: Arc::clone(&self.fields),
            observers: Arc::clone(&self.observers),
            hooks: Arc::clone(&self.hooks),
            _model: PhantomData,
        }
    }
}

impl<S> Default for FormInstance<S> {
    fn default() -> Self {
        Self::new(FormOptions::default())
    }
}

impl<S> FormInstance<S> {
    pub fn new(options: FormOptions) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                initial: Store::new(),
                store: Store::new(),
                submit_state: SubmitState::Idle,
                submit_count: 0,
                field_meta: BTreeMap::new(),
                tickets: BTreeMap::new(),
                next_ticket: 0,
                validated: BTreeSet::new(),
            })),
            fields: Arc::new(RwLock::new(Vec::new())),
            observers: Arc::new(RwLock::new(BTreeMap::new())),
            hooks: Arc::new(RwLock::new(FormHooks::default())),
            _model: PhantomData,
        }
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn same_form(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Merges `initial` into both the initial snapshot and the live store.
    pub(super) fn initialize(&self, initial: Value) -> FormResult<()> {
        let (prev, curr) = {
            let mut state = write_lock(&self.state, "applying initial values")?;
            let prev = state.store.as_value().clone();
            state.initial.merge(initial.clone());
            state.store.merge(initial);
            state.refresh_dirty();
            (prev, state.store.as_value().clone())
        };
        if prev != curr {
            self.notify(&FormEvent::ValuesChanged {
                prev: &prev,
                curr: &curr,
            })?;
        }
        Ok(())
    }

    pub(super) fn install_hooks(&self, hooks: FormHooks) -> FormResult<()> {
        *write_lock(&self.hooks, "installing form hooks")? = hooks;
        Ok(())
    }

    pub fn get_field_value(&self, path: impl Into<FieldPath>) -> FormResult<Option<Value>> {
        let path = path.into();
        Ok(read_lock(&self.state, "reading field value")?
            .store
            .get(&path)
            .cloned())
    }

    /// All values with `None`, otherwise a nested partial object holding only
    /// the requested paths.
    pub fn get_fields_value(&self, paths: Option<&[FieldPath]>) -> FormResult<Value> {
        let state = read_lock(&self.state, "reading field values")?;
        Ok(match paths {
            None => state.store.as_value().clone(),
            Some(paths) => state.store.pick(paths),
        })
    }

    pub fn values(&self) -> FormResult<S>
    where
        S: DeserializeOwned,
    {
        read_lock(&self.state, "reading typed values")?.store.to_model()
    }

    pub fn value<L>(&self, lens: L) -> FormResult<Option<L::Value>>
    where
        L: FieldLens<S>,
    {
        match self.get_field_value(lens.path())? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn get_field_error(&self, path: impl Into<FieldPath>) -> FormResult<Vec<FieldError>> {
        let path = path.into();
        Ok(read_lock(&self.state, "reading field errors")?
            .field_meta
            .get(&path)
            .map(|meta| meta.errors.clone())
            .unwrap_or_default())
    }

    /// Errors of the requested fields, or of every registered field in
    /// registration order.
    pub fn get_fields_error(&self, paths: Option<&[FieldPath]>) -> FormResult<Vec<FieldErrors>> {
        let targets = self.target_paths(paths)?;
        let state = read_lock(&self.state, "reading fields errors")?;
        Ok(targets
            .into_iter()
            .map(|name| {
                let errors = state
                    .field_meta
                    .get(&name)
                    .map(|meta| meta.errors.clone())
                    .unwrap_or_default();
                FieldErrors { name, errors }
            })
            .collect())
    }

    pub fn is_field_touched(&self, path: impl Into<FieldPath>) -> FormResult<bool> {
        let path = path.into();
        Ok(read_lock(&self.state, "reading touched flag")?
            .field_meta
            .get(&path)
            .is_some_and(|meta| meta.touched))
    }

    /// With `all_touched` every target must be touched; otherwise any one is
    /// enough.
    pub fn is_fields_touched(
        &self,
        paths: Option<&[FieldPath]>,
        all_touched: bool,
    ) -> FormResult<bool> {
        let targets = self.target_paths(paths)?;
        let state = read_lock(&self.state, "reading touched flags")?;
        let touched = |path: &FieldPath| state.field_meta.get(path).is_some_and(|meta| meta.touched);
        Ok(if all_touched {
            targets.iter().all(touched)
        } else {
            targets.iter().any(touched)
        })
    }

    pub fn is_field_validating(&self, path: impl Into<FieldPath>) -> FormResult<bool> {
        let path = path.into();
        Ok(read_lock(&self.state, "reading validating flag")?
            .field_meta
            .get(&path)
            .is_some_and(|meta| meta.validating))
    }

    pub fn is_fields_validating(&self, paths: Option<&[FieldPath]>) -> FormResult<bool> {
        let targets = self.target_paths(paths)?;
        let state = read_lock(&self.state, "reading validating flags")?;
        Ok(targets
            .iter()
            .any(|path| state.field_meta.get(path).is_some_and(|meta| meta.validating)))
    }

    pub fn field_meta(&self, path: impl Into<FieldPath>) -> FormResult<Option<FieldMeta>> {
        let path = path.into();
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&path)
            .cloned())
    }

    pub fn first_error_field(&self) -> FormResult<Option<FieldPath>> {
        let registered = self.registered_paths()?;
        let state = read_lock(&self.state, "reading first error field")?;
        Ok(registered.into_iter().find(|path| {
            state
                .field_meta
                .get(path)
                .is_some_and(|meta| !meta.errors.is_empty())
        }))
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            values: state.store.as_value().clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            is_dirty: state.store != state.initial,
            is_valid: state.field_meta.values().all(|meta| meta.errors.is_empty()),
            field_meta: state.field_meta.clone(),
        })
    }

    pub fn registered_paths(&self) -> FormResult<Vec<FieldPath>> {
        Ok(read_lock(&self.fields, "reading registered fields")?
            .iter()
            .map(|entry| entry.path.clone())
            .collect())
    }

    pub fn dep_values(&self, deps: &[FieldPath]) -> FormResult<DepValues> {
        let state = read_lock(&self.state, "reading dependency values")?;
        Ok(DepValues::new(state.store.pick(deps)))
    }

    pub fn set_field_value(
        &self,
        path: impl Into<FieldPath>,
        value: impl Into<Value>,
    ) -> FormResult<()> {
        let path = path.into();
        let value = value.into();
        self.update_store("setting field value", |store| store.set(&path, value))
    }

    /// Deep-merges a partial value into the store. Does not touch fields or
    /// run validation.
    pub fn set_fields_value(&self, partial: impl Serialize) -> FormResult<()> {
        let patch = serde_json::to_value(partial)?;
        if !patch.is_object() {
            return Err(FormError::NotAnObject);
        }
        self.update_store("merging field values", |store| store.merge(patch))
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<S>,
    {
        let value = serde_json::to_value(value)?;
        self.set_field_value(lens.path(), value)
    }

    pub fn set_fields(&self, fields: Vec<FieldData>) -> FormResult<()> {
        let mut touched_meta = Vec::new();
        let (prev, curr) = {
            let mut state = write_lock(&self.state, "setting field data")?;
            let prev = state.store.as_value().clone();
            for field in fields {
                if let Some(value) = field.value {
                    state.store.set(&field.name, value);
                }
                let meta_changed =
                    field.touched.is_some() || field.validating.is_some() || field.errors.is_some();
                let meta = state.ensure_meta(&field.name);
                if let Some(touched) = field.touched {
                    meta.touched = touched;
                }
                if let Some(validating) = field.validating {
                    meta.validating = validating;
                }
                if let Some(errors) = field.errors {
                    meta.errors = errors;
                }
                if meta_changed {
                    touched_meta.push(field.name);
                }
            }
            state.refresh_dirty();
            (prev, state.store.as_value().clone())
        };
        if prev != curr {
            self.notify(&FormEvent::ValuesChanged {
                prev: &prev,
                curr: &curr,
            })?;
        }
        for path in &touched_meta {
            self.notify(&FormEvent::MetaChanged(path))?;
        }
        Ok(())
    }

    /// Restores initial values and clears field state. `None` resets the
    /// whole form including the submit state.
    pub fn reset_fields(&self, paths: Option<&[FieldPath]>) -> FormResult<()> {
        let (prev, curr, affected) = {
            let mut state = write_lock(&self.state, "resetting fields")?;
            let prev = state.store.as_value().clone();
            let affected: Vec<FieldPath> = match paths {
                None => {
                    state.store = state.initial.clone();
                    state.tickets.clear();
                    state.validated.clear();
                    transition_submit_state(&mut state, SubmitState::Idle)?;
                    for meta in state.field_meta.values_mut() {
                        *meta = FieldMeta::default();
                    }
                    state.field_meta.keys().cloned().collect()
                }
                Some(paths) => {
                    for path in paths {
                        let initial = state.initial.get(path).cloned();
                        match initial {
                            Some(value) => state.store.set(path, value),
                            None => {
                                state.store.remove(path);
                            }
                        }
                        state.tickets.remove(path);
                        state.validated.remove(path);
                        *state.ensure_meta(path) = FieldMeta::default();
                    }
                    paths.to_vec()
                }
            };
            state.refresh_dirty();
            (prev, state.store.as_value().clone(), affected)
        };
        tracing::debug!(fields = affected.len(), "reset form fields");
        if prev != curr {
            self.notify(&FormEvent::ValuesChanged {
                prev: &prev,
                curr: &curr,
            })?;
        }
        for path in &affected {
            self.notify(&FormEvent::MetaChanged(path))?;
        }
        Ok(())
    }

    pub fn touch(&self, path: impl Into<FieldPath>) -> FormResult<()> {
        let path = path.into();
        let changed = {
            let mut state = write_lock(&self.state, "touching field")?;
            let meta = state.ensure_meta(&path);
            !std::mem::replace(&mut meta.touched, true)
        };
        if changed {
            self.notify(&FormEvent::MetaChanged(&path))?;
        }
        Ok(())
    }

    /// User input: writes the value, marks the field touched, informs
    /// listeners and then validates according to the configured triggers.
    pub async fn change_field(
        &self,
        path: impl Into<FieldPath>,
        value: impl Into<Value>,
    ) -> FormResult<()> {
        let path = path.into();
        let value = value.into();
        let (prev, curr) = {
            let mut state = write_lock(&self.state, "applying field change")?;
            let prev = state.store.as_value().clone();
            state.store.set(&path, value);
            state.ensure_meta(&path).touched = true;
            state.refresh_dirty();
            (prev, state.store.as_value().clone())
        };
        tracing::trace!(field = %path, "field changed");

        let listener = read_lock(&self.hooks, "reading values change hook")?
            .values_change
            .clone();
        if let Some(listener) = listener {
            listener(&path::pick(&curr, [&path]), &curr);
        }
        self.notify(&FormEvent::ValuesChanged {
            prev: &prev,
            curr: &curr,
        })?;
        self.notify(&FormEvent::MetaChanged(&path))?;

        if self.trigger_for(&path)? == Some(ValidationMode::OnChange) {
            self.run_validation(&path, ValidationTrigger::Change).await?;
        }
        if self.options.revalidate_dependents == RevalidateMode::OnChange {
            self.revalidate_dependents(&path).await?;
        }
        Ok(())
    }

    pub async fn blur_field(&self, path: impl Into<FieldPath>) -> FormResult<()> {
        let path = path.into();
        self.touch(path.clone())?;
        if self.trigger_for(&path)? == Some(ValidationMode::OnBlur) {
            self.run_validation(&path, ValidationTrigger::Blur).await?;
        }
        if self.options.revalidate_dependents == RevalidateMode::OnBlur {
            self.revalidate_dependents(&path).await?;
        }
        Ok(())
    }

    /// Validates the requested registered fields, or all of them, and
    /// resolves to the current values when every run passed.
    pub async fn validate_fields(&self, paths: Option<&[FieldPath]>) -> FormResult<Value> {
        self.validate_with(paths, ValidationTrigger::Manual).await
    }

    /// Validates every field, then hands the values to the finish hook.
    /// A failed validation is an `Ok(Blocked)` outcome, not an error. A
    /// submit that starts while another is validating or submitting returns
    /// `AlreadySubmitting`.
    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if matches!(
                state.submit_state,
                SubmitState::Validating | SubmitState::Submitting
            ) {
                return Err(FormError::AlreadySubmitting);
            }
            transition_submit_state(&mut state, SubmitState::Validating)?;
            state.submit_count = state.submit_count.saturating_add(1);
        }
        let _in_flight = SubmitInFlight { state: &self.state };

        let values = match self.validate_with(None, ValidationTrigger::Submit).await {
            Ok(values) => values,
            Err(FormError::ValidationFailed(info)) => {
                {
                    let mut state = write_lock(&self.state, "handling submit validation failure")?;
                    transition_submit_state(&mut state, SubmitState::Failed)?;
                }
                tracing::debug!(
                    failed = info.error_fields.len(),
                    out_of_date = info.out_of_date,
                    "submit blocked by validation"
                );
                let hook = read_lock(&self.hooks, "reading finish failed hook")?
                    .finish_failed
                    .clone();
                if let Some(hook) = hook {
                    hook(&info);
                }
                return Ok(SubmitOutcome::Blocked(info));
            }
            Err(error) => {
                let mut state = write_lock(&self.state, "handling submit error")?;
                transition_submit_state(&mut state, SubmitState::Failed)?;
                return Err(error);
            }
        };

        {
            let mut state = write_lock(&self.state, "moving submit state to submitting")?;
            transition_submit_state(&mut state, SubmitState::Submitting)?;
        }
        let hook = read_lock(&self.hooks, "reading finish hook")?.finish.clone();
        let submit_result = match hook {
            Some(hook) => hook(&values),
            None => Ok(()),
        };

        {
            let mut state = write_lock(&self.state, "completing submit")?;
            if submit_result.is_ok() {
                transition_submit_state(&mut state, SubmitState::Succeeded)?;
                tracing::debug!(submit_count = state.submit_count, "form submitted");
            } else {
                transition_submit_state(&mut state, SubmitState::Failed)?;
            }
        }
        submit_result.map(|()| SubmitOutcome::Submitted)
    }

    /// Registers or replaces the field at `entry.path`. Registration order is
    /// the order fields are validated and reported in.
    pub fn register_field(&self, entry: FieldEntry) -> FormResult<()> {
        let path = entry.path.clone();
        let deps = entry.deps.len();
        {
            let mut fields = write_lock(&self.fields, "registering field")?;
            match fields.iter_mut().find(|existing| existing.path == path) {
                Some(existing) => *existing = entry,
                None => fields.push(entry),
            }
        }
        {
            let mut state = write_lock(&self.state, "creating field meta")?;
            state.ensure_meta(&path);
            state.refresh_dirty();
        }
        tracing::debug!(field = %path, deps, "registered field");
        Ok(())
    }

    /// Drops the field's registration and state. Its value stays in the store.
    pub fn unregister_field(&self, path: &FieldPath) -> FormResult<()> {
        write_lock(&self.fields, "unregistering field")?.retain(|entry| &entry.path != path);
        {
            let mut state = write_lock(&self.state, "discarding field meta")?;
            state.field_meta.remove(path);
            state.tickets.remove(path);
            state.validated.remove(path);
        }
        tracing::debug!(field = %path, "unregistered field");
        Ok(())
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&FormEvent<'_>) + Send + Sync + 'static,
    ) -> FormResult<SubscriptionId> {
        let id = SubscriptionId::next();
        write_lock(&self.observers, "subscribing observer")?.insert(id, Arc::new(observer));
        Ok(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> FormResult<()> {
        write_lock(&self.observers, "unsubscribing observer")?.remove(&id);
        Ok(())
    }

    fn notify(&self, event: &FormEvent<'_>) -> FormResult<()> {
        let observers: Vec<FieldObserver> = read_lock(&self.observers, "reading observers")?
            .values()
            .cloned()
            .collect();
        for observer in observers {
            observer(event);
        }
        Ok(())
    }

    fn update_store(
        &self,
        context: &'static str,
        mutate: impl FnOnce(&mut Store),
    ) -> FormResult<()> {
        let (prev, curr) = {
            let mut state = write_lock(&self.state, context)?;
            let prev = state.store.as_value().clone();
            mutate(&mut state.store);
            state.refresh_dirty();
            (prev, state.store.as_value().clone())
        };
        if prev != curr {
            self.notify(&FormEvent::ValuesChanged {
                prev: &prev,
                curr: &curr,
            })?;
        }
        Ok(())
    }

    fn target_paths(&self, paths: Option<&[FieldPath]>) -> FormResult<Vec<FieldPath>> {
        match paths {
            Some(paths) => Ok(paths.to_vec()),
            None => self.registered_paths(),
        }
    }

    fn field_entry(&self, path: &FieldPath) -> FormResult<Option<FieldEntry>> {
        Ok(read_lock(&self.fields, "reading field entry")?
            .iter()
            .find(|entry| &entry.path == path)
            .cloned())
    }

    fn trigger_for(&self, path: &FieldPath) -> FormResult<Option<ValidationMode>> {
        Ok(self.field_entry(path)?.map(|entry| {
            entry
                .validate_trigger
                .unwrap_or(self.options.validate_trigger)
        }))
    }

    pub(super) async fn run_validation(
        &self,
        path: &FieldPath,
        trigger: ValidationTrigger,
    ) -> FormResult<ValidationOutcome> {
        let Some(entry) = self.field_entry(path)? else {
            return Ok(ValidationOutcome::Passed);
        };
        let ticket = {
            let mut state = write_lock(&self.state, "starting field validation")?;
            let ticket = state.issue_ticket(path);
            state.ensure_meta(path).validating = true;
            ticket
        };
        self.notify(&FormEvent::MetaChanged(path))?;

        let debounce = entry
            .debounce
            .unwrap_or_else(|| self.options.validate_debounce());
        let debounced = matches!(
            trigger,
            ValidationTrigger::Change | ValidationTrigger::Blur | ValidationTrigger::Dependency
        );
        if debounced && !debounce.is_zero() {
            Delay::new(debounce).await;
            if !self.is_latest_ticket(path, ticket)? {
                tracing::debug!(field = %path, ticket = ticket.0, "validation superseded during debounce");
                return Ok(ValidationOutcome::Superseded);
            }
        }

        let (value, deps) = {
            let state = read_lock(&self.state, "reading values for validation")?;
            (
                state.store.get(path).cloned(),
                DepValues::new(state.store.pick(&entry.deps)),
            )
        };
        let validator = entry.validators.resolve(&deps);
        let rule = Rule {
            field: path.clone(),
            trigger,
        };
        tracing::debug!(field = %path, %trigger, ticket = ticket.0, "validating field");
        let result = validator.validate(&rule, value.as_ref()).await;

        let failure = result.as_ref().err().cloned();
        if !self.finish_validation(path, ticket, result)? {
            return Ok(ValidationOutcome::Superseded);
        }
        Ok(match failure {
            Some(error) => ValidationOutcome::Failed(error),
            None => ValidationOutcome::Passed,
        })
    }

    fn is_latest_ticket(&self, path: &FieldPath, ticket: ValidationTicket) -> FormResult<bool> {
        Ok(read_lock(&self.state, "checking validation ticket")?
            .tickets
            .get(path)
            .is_some_and(|latest| *latest == ticket))
    }

    /// Applies a finished run unless a newer one was started meanwhile.
    fn finish_validation(
        &self,
        path: &FieldPath,
        ticket: ValidationTicket,
        result: Result<(), FieldError>,
    ) -> FormResult<bool> {
        {
            let mut state = write_lock(&self.state, "finishing field validation")?;
            if state.tickets.get(path) != Some(&ticket) {
                tracing::debug!(field = %path, ticket = ticket.0, "discarding stale validation result");
                return Ok(false);
            }
            let meta = state.ensure_meta(path);
            meta.validating = false;
            meta.errors = match result {
                Ok(()) => Vec::new(),
                Err(error) => vec![error],
            };
            state.validated.insert(path.clone());
        }
        self.notify(&FormEvent::MetaChanged(path))?;
        Ok(true)
    }

    /// Re-runs fields that depend on `source` and were already touched or
    /// validated.
    async fn revalidate_dependents(&self, source: &FieldPath) -> FormResult<()> {
        let candidates: Vec<FieldPath> = read_lock(&self.fields, "reading field dependencies")?
            .iter()
            .filter(|entry| &entry.path != source && entry.deps.iter().any(|dep| dep.overlaps(source)))
            .map(|entry| entry.path.clone())
            .collect();
        let dependents: Vec<FieldPath> = {
            let state = read_lock(&self.state, "reading dependent field state")?;
            candidates
                .into_iter()
                .filter(|path| {
                    state.validated.contains(path)
                        || state.field_meta.get(path).is_some_and(|meta| {
                            meta.touched || !meta.errors.is_empty()
                        })
                })
                .collect()
        };
        for dependent in &dependents {
            tracing::trace!(field = %dependent, source = %source, "revalidating dependent field");
            self.run_validation(dependent, ValidationTrigger::Dependency)
                .await?;
        }
        Ok(())
    }

    async fn validate_with(
        &self,
        paths: Option<&[FieldPath]>,
        trigger: ValidationTrigger,
    ) -> FormResult<Value> {
        let targets: Vec<FieldPath> = read_lock(&self.fields, "collecting fields to validate")?
            .iter()
            .map(|entry| &entry.path)
            .filter(|path| paths.is_none_or(|wanted| wanted.contains(*path)))
            .cloned()
            .collect();
        let outcomes = join_all(
            targets
                .iter()
                .map(|path| self.run_validation(path, trigger)),
        )
        .await;

        let mut error_fields = Vec::new();
        let mut out_of_date = false;
        for (path, outcome) in targets.iter().zip(outcomes) {
            match outcome? {
                ValidationOutcome::Passed => {}
                ValidationOutcome::Failed(error) => error_fields.push(FieldErrors {
                    name: path.clone(),
                    errors: vec![error],
                }),
                ValidationOutcome::Superseded => out_of_date = true,
            }
        }
        let values = self.get_fields_value(None)?;
        if error_fields.is_empty() && !out_of_date {
            Ok(values)
        } else {
            Err(FormError::ValidationFailed(ValidateErrorInfo {
                values,
                error_fields,
                out_of_date,
            }))
        }
    }
}

/// Moves a submit that never reached a final state to `Failed` when it is
/// dropped, so a panicking callback or a cancelled future does not leave the
/// form locked in `Validating` or `Submitting`.
struct SubmitInFlight<'a> {
    state: &'a RwLock<FormState>,
}

impl Drop for SubmitInFlight<'_> {
    fn drop(&mut self) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        if matches!(
            state.submit_state,
            SubmitState::Validating | SubmitState::Submitting
        ) {
            tracing::warn!(from = ?state.submit_state, "submit ended early, marking it failed");
            state.submit_state = SubmitState::Failed;
        }
    }
}

pub(super) fn transition_submit_state(
    state: &mut FormState,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Validating)
            | (SubmitState::Validating, SubmitState::Submitting)
            | (SubmitState::Validating, SubmitState::Failed)
            | (SubmitState::Submitting, SubmitState::Succeeded)
            | (SubmitState::Submitting, SubmitState::Failed)
            | (SubmitState::Succeeded, SubmitState::Validating)
            | (SubmitState::Failed, SubmitState::Validating)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.submit_state = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
