use super::*;
use futures::executor::block_on;
use futures::future::join;
use futures_timer::Delay;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::controller::transition_submit_state;
use crate::validators;
use crate::widgets::Node;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FormModel)]
struct Profile {
    email: String,
    password: String,
    confirm_password: String,
    enabled: bool,
    tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct Summary {
    email: String,
    tag_count: usize,
}

fn base_profile() -> Profile {
    Profile {
        email: "user@example.com".to_string(),
        password: "pass".to_string(),
        confirm_password: "pass".to_string(),
        enabled: false,
        tags: vec!["a".to_string()],
    }
}

fn mounted(options: FormOptions) -> (Form<Profile>, FormInstance<Profile>) {
    let instance = FormInstance::<Profile>::new(options);
    let form = Form::<Profile>::new(instance.clone())
        .initial_values(base_profile())
        .expect("initial values")
        .mount()
        .expect("mount");
    (form, instance)
}

fn required_entry(name: &str, message: &'static str) -> FieldEntry {
    FieldEntry::new(name).validators(validators![validators::required(message)])
}

fn messages(instance: &FormInstance<Profile>, name: &str) -> Vec<String> {
    instance
        .get_field_error(name)
        .expect("errors")
        .iter()
        .map(|error| error.message().to_string())
        .collect()
}

#[test]
fn field_lens_updates_model_and_dirty_state() {
    let fields = Profile::fields();
    let (_form, instance) = mounted(FormOptions::default());
    instance.register_field(FieldEntry::new("email")).expect("register");

    instance
        .set(fields.email(), "next@example.com".to_string())
        .expect("set email");
    assert_eq!(
        instance.value(fields.email()).expect("email"),
        Some("next@example.com".to_string())
    );
    let snapshot = instance.snapshot().expect("snapshot");
    assert!(snapshot.is_dirty);
    assert!(snapshot.field_meta[&fields.email().path()].dirty);

    instance
        .set(fields.email(), "user@example.com".to_string())
        .expect("restore email");
    assert!(!instance.snapshot().expect("snapshot").is_dirty);
    assert_eq!(instance.values().expect("values"), base_profile());
}

#[test]
fn derive_macro_generates_field_lenses() {
    let fields = Profile::fields();
    assert_eq!(fields.email().path(), FieldPath::key("email"));
    assert_eq!(fields.confirm_password().path().to_string(), "confirm_password");

    let mut profile = base_profile();
    fields.tags().set(&mut profile, vec!["x".to_string(), "y".to_string()]);
    assert_eq!(fields.tags().get(&profile).len(), 2);
}

#[test]
fn partial_reads_and_writes_use_nested_paths() {
    let instance = FormInstance::<Value>::new(FormOptions::default());
    instance
        .set_fields_value(json!({ "user": { "name": "ann", "age": 3 }, "flag": true }))
        .expect("merge");
    instance
        .set_fields_value(json!({ "user": { "age": 4 } }))
        .expect("merge nested");

    let picked = instance
        .get_fields_value(Some(&[crate::field_path!["user", "age"], FieldPath::key("missing")]))
        .expect("pick");
    assert_eq!(picked, json!({ "user": { "age": 4 } }));
    assert_eq!(
        instance
            .get_field_value(crate::field_path!["user", "name"])
            .expect("name"),
        Some(json!("ann"))
    );
    assert!(matches!(
        instance.set_fields_value(json!([1, 2])),
        Err(FormError::NotAnObject)
    ));
}

#[test]
fn validation_mode_controls_when_errors_appear() {
    let (_form, instance) = mounted(FormOptions::default());
    instance
        .register_field(required_entry("email", "required").validate_trigger(ValidationMode::OnBlur))
        .expect("register email");
    instance
        .register_field(
            required_entry("password", "password required")
                .validate_trigger(ValidationMode::OnSubmit),
        )
        .expect("register password");

    block_on(instance.change_field("email", "")).expect("change email");
    assert!(messages(&instance, "email").is_empty());
    assert!(instance.is_field_touched("email").expect("touched"));
    block_on(instance.blur_field("email")).expect("blur email");
    assert_eq!(messages(&instance, "email"), vec!["required".to_string()]);

    block_on(instance.change_field("password", "")).expect("change password");
    block_on(instance.blur_field("password")).expect("blur password");
    assert!(messages(&instance, "password").is_empty());

    let result = block_on(instance.validate_fields(Some(&[FieldPath::key("password")])));
    let Err(FormError::ValidationFailed(info)) = result else {
        panic!("password should fail validation");
    };
    assert_eq!(info.error_fields.len(), 1);
    assert_eq!(info.error_fields[0].name, FieldPath::key("password"));
    assert!(!info.out_of_date);
    assert_eq!(info.values["email"], json!(""));
}

#[test]
fn dependencies_revalidate_linked_fields() {
    let (_form, instance) = mounted(FormOptions::default());
    instance
        .register_field(FieldEntry::new("password"))
        .expect("register password");
    instance
        .register_field(
            FieldEntry::new("confirm_password")
                .deps(["password"])
                .validators(ValidatorList::computed(|deps| {
                    validators![validators::should_be_equal(
                        deps.get("password").cloned(),
                        "password mismatch",
                    )]
                })),
        )
        .expect("register confirm");

    block_on(instance.change_field("confirm_password", "secret")).expect("change confirm");
    assert_eq!(
        messages(&instance, "confirm_password"),
        vec!["password mismatch".to_string()]
    );

    block_on(instance.change_field("password", "secret")).expect("change password");
    assert!(messages(&instance, "confirm_password").is_empty());

    block_on(instance.change_field("password", "secret2")).expect("change password again");
    assert_eq!(
        messages(&instance, "confirm_password"),
        vec!["password mismatch".to_string()]
    );
}

#[test]
fn untouched_dependents_are_not_revalidated() {
    let (_form, instance) = mounted(FormOptions::default());
    instance
        .register_field(required_entry("confirm_password", "required").deps(["password"]))
        .expect("register confirm");
    instance
        .set_field_value("confirm_password", "")
        .expect("clear confirm");

    block_on(instance.change_field("password", "secret")).expect("change password");
    assert!(messages(&instance, "confirm_password").is_empty());
}

#[test]
fn async_validation_ticket_keeps_latest_result() {
    let (_form, instance) = mounted(FormOptions::default());
    let validator = async_validator(|_rule: Rule, value: Option<Value>| async move {
        if value.as_ref().and_then(Value::as_str) == Some("slow") {
            Delay::new(Duration::from_millis(60)).await;
            Err(FieldError::new("slow result"))
        } else {
            Delay::new(Duration::from_millis(5)).await;
            Ok(())
        }
    });
    instance
        .register_field(FieldEntry::new("email").validators(validators![validator]))
        .expect("register email");

    let (slow, fast) = block_on(join(
        instance.change_field("email", "slow"),
        instance.change_field("email", "fast"),
    ));
    slow.expect("slow change");
    fast.expect("fast change");

    assert!(messages(&instance, "email").is_empty());
    assert!(!instance.is_field_validating("email").expect("validating"));
    assert_eq!(
        instance.get_field_value("email").expect("email"),
        Some(json!("fast"))
    );
}

#[test]
fn superseded_run_marks_validate_result_out_of_date() {
    let (_form, instance) = mounted(FormOptions::default());
    let validator = async_validator(|_rule: Rule, _value: Option<Value>| async move {
        Delay::new(Duration::from_millis(30)).await;
        Ok::<(), FieldError>(())
    });
    instance
        .register_field(FieldEntry::new("email").validators(validators![validator]))
        .expect("register email");

    let (validated, changed) = block_on(join(
        instance.validate_fields(None),
        instance.change_field("email", "later@example.com"),
    ));
    changed.expect("change");
    let Err(FormError::ValidationFailed(info)) = validated else {
        panic!("first run should be superseded");
    };
    assert!(info.out_of_date);
    assert!(info.error_fields.is_empty());
}

#[test]
fn debounced_validator_runs_only_for_latest_value() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let validator: ValidatorRef = Arc::new(move |_: &Rule, value: Option<&Value>| {
        counter.fetch_add(1, Ordering::SeqCst);
        if value.and_then(Value::as_str) == Some("bad") {
            Err(FieldError::new("email invalid"))
        } else {
            Ok(())
        }
    });
    let (_form, instance) = mounted(FormOptions {
        validate_debounce_ms: 30,
        ..FormOptions::default()
    });
    instance
        .register_field(FieldEntry::new("email").validators(validators![validator]))
        .expect("register email");

    let (first, second) = block_on(join(
        instance.change_field("email", "bad"),
        instance.change_field("email", "good"),
    ));
    first.expect("first change");
    second.expect("second change");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(messages(&instance, "email").is_empty());

    block_on(instance.validate_fields(None)).expect("manual run skips debounce");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn field_debounce_overrides_form_default() {
    let (_form, instance) = mounted(FormOptions::default());
    instance
        .register_field(required_entry("email", "required").debounce(Duration::from_millis(20)))
        .expect("register email");

    let (first, second) = block_on(join(
        instance.change_field("email", ""),
        instance.change_field("email", "x"),
    ));
    first.expect("first change");
    second.expect("second change");
    assert!(messages(&instance, "email").is_empty());
}

#[test]
fn submit_blocks_on_errors_then_succeeds() {
    let finished = Arc::new(Mutex::new(Vec::new()));
    let failed = Arc::new(AtomicUsize::new(0));
    let instance = FormInstance::<Profile>::new(FormOptions::default());
    let _form = {
        let finished = Arc::clone(&finished);
        let failed = Arc::clone(&failed);
        Form::<Profile>::new(instance.clone())
            .initial_values(base_profile())
            .expect("initial values")
            .on_finish(move |profile: Profile| finished.lock().expect("finished").push(profile))
            .on_finish_failed(move |_| {
                failed.fetch_add(1, Ordering::SeqCst);
            })
            .mount()
            .expect("mount")
    };
    instance
        .register_field(required_entry("email", "required"))
        .expect("register email");

    instance.set_field_value("email", "").expect("clear email");
    let outcome = block_on(instance.submit()).expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
    assert!(finished.lock().expect("finished").is_empty());
    assert_eq!(failed.load(Ordering::SeqCst), 1);
    let snapshot = instance.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Failed);
    assert!(!snapshot.is_valid);

    instance
        .set_field_value("email", "valid@example.com")
        .expect("set email");
    let outcome = block_on(instance.submit()).expect("submit");
    assert_eq!(outcome, SubmitOutcome::Submitted);
    let snapshot = instance.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Succeeded);
    assert_eq!(snapshot.submit_count, 2);
    assert_eq!(finished.lock().expect("finished").len(), 1);
    assert_eq!(finished.lock().expect("finished")[0].email, "valid@example.com");
}

#[test]
fn submit_state_transitions_are_enforced() {
    let instance = FormInstance::<Profile>::new(FormOptions::default());
    {
        let mut state = instance.state.write().expect("state");
        let result = transition_submit_state(&mut state, SubmitState::Succeeded);
        assert!(matches!(
            result,
            Err(FormError::InvalidStateTransition {
                from: SubmitState::Idle,
                to: SubmitState::Succeeded,
            })
        ));
        transition_submit_state(&mut state, SubmitState::Validating).expect("validating");
        transition_submit_state(&mut state, SubmitState::Submitting).expect("submitting");
    }
    assert!(matches!(
        block_on(instance.submit()),
        Err(FormError::AlreadySubmitting)
    ));
    assert_eq!(
        instance.snapshot().expect("snapshot").submit_state,
        SubmitState::Submitting
    );
}

#[test]
fn second_submit_is_rejected_while_first_is_validating() {
    let finished = Arc::new(AtomicUsize::new(0));
    let instance = FormInstance::<Profile>::new(FormOptions::default());
    let _form = {
        let finished = Arc::clone(&finished);
        Form::<Profile>::new(instance.clone())
            .initial_values(base_profile())
            .expect("initial values")
            .on_finish(move |_profile: Profile| {
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .mount()
            .expect("mount")
    };
    let validator = async_validator(|_rule: Rule, _value: Option<Value>| async move {
        Delay::new(Duration::from_millis(30)).await;
        Ok::<(), FieldError>(())
    });
    instance
        .register_field(FieldEntry::new("email").validators(validators![validator]))
        .expect("register email");

    let (first, second) = block_on(join(instance.submit(), instance.submit()));
    assert_eq!(first.expect("first submit"), SubmitOutcome::Submitted);
    assert!(matches!(second, Err(FormError::AlreadySubmitting)));
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    let snapshot = instance.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Succeeded);
    assert_eq!(snapshot.submit_count, 1);
}

#[test]
fn panicking_finish_callback_leaves_form_submittable() {
    let panicked = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicUsize::new(0));
    let instance = FormInstance::<Profile>::new(FormOptions::default());
    let _form = {
        let panicked = Arc::clone(&panicked);
        let finished = Arc::clone(&finished);
        Form::<Profile>::new(instance.clone())
            .initial_values(base_profile())
            .expect("initial values")
            .on_finish(move |_profile: Profile| {
                if !panicked.swap(true, Ordering::SeqCst) {
                    panic!("finish callback failed");
                }
                finished.fetch_add(1, Ordering::SeqCst);
            })
            .mount()
            .expect("mount")
    };

    let caught = catch_unwind(AssertUnwindSafe(|| block_on(instance.submit())));
    assert!(caught.is_err());
    assert_eq!(
        instance.snapshot().expect("snapshot").submit_state,
        SubmitState::Failed
    );

    assert_eq!(
        block_on(instance.submit()).expect("retry submit"),
        SubmitOutcome::Submitted
    );
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert_eq!(
        instance.snapshot().expect("snapshot").submit_state,
        SubmitState::Succeeded
    );
}

#[test]
fn failing_finish_hook_marks_submit_failed() {
    let instance = FormInstance::<Profile>::new(FormOptions::default());
    let _form = Form::<Profile>::new(instance.clone())
        .initial_values(json!({ "email": "only" }))
        .expect("initial values")
        .on_finish(|_profile: Profile| {})
        .mount()
        .expect("mount");

    assert!(matches!(block_on(instance.submit()), Err(FormError::Serde(_))));
    assert_eq!(
        instance.snapshot().expect("snapshot").submit_state,
        SubmitState::Failed
    );
}

#[test]
fn reset_field_and_full_reset_are_consistent() {
    let (_form, instance) = mounted(FormOptions::default());
    instance
        .register_field(required_entry("email", "required"))
        .expect("register email");

    block_on(instance.change_field("email", "")).expect("change email");
    assert_eq!(messages(&instance, "email"), vec!["required".to_string()]);

    instance
        .reset_fields(Some(&[FieldPath::key("email")]))
        .expect("reset email");
    assert_eq!(
        instance.get_field_value("email").expect("email"),
        Some(json!("user@example.com"))
    );
    assert_eq!(instance.field_meta("email").expect("meta"), Some(FieldMeta::default()));

    block_on(instance.submit()).expect("submit");
    instance.set_field_value("password", "changed").expect("password");
    instance.reset_fields(None).expect("reset all");
    let snapshot = instance.snapshot().expect("snapshot");
    assert_eq!(snapshot.submit_state, SubmitState::Idle);
    assert!(!snapshot.is_dirty);
    assert_eq!(snapshot.values["password"], json!("pass"));
}

#[test]
fn set_fields_updates_values_and_meta_together() {
    let (_form, instance) = mounted(FormOptions::default());
    instance.register_field(FieldEntry::new("email")).expect("register email");
    instance
        .register_field(FieldEntry::new("password"))
        .expect("register password");

    instance
        .set_fields(vec![
            FieldData::new("email")
                .value("taken@example.com")
                .touched(true)
                .errors(vec![FieldError::new("email taken")]),
        ])
        .expect("set fields");

    assert_eq!(messages(&instance, "email"), vec!["email taken".to_string()]);
    assert!(instance.is_fields_touched(None, false).expect("any touched"));
    assert!(!instance.is_fields_touched(None, true).expect("all touched"));
    assert_eq!(instance.first_error_field().expect("first"), Some(FieldPath::key("email")));
    let errors = instance.get_fields_error(None).expect("errors");
    assert_eq!(errors.len(), 2);
    assert!(errors[1].errors.is_empty());
}

#[test]
fn first_error_field_follows_registration_order() {
    let (_form, instance) = mounted(FormOptions::default());
    instance
        .register_field(required_entry("password", "password required"))
        .expect("register password");
    instance
        .register_field(required_entry("email", "email required"))
        .expect("register email");
    instance
        .set_fields_value(json!({ "email": "", "password": "" }))
        .expect("clear");

    assert!(block_on(instance.validate_fields(None)).is_err());
    assert_eq!(
        instance.first_error_field().expect("first"),
        Some(FieldPath::key("password"))
    );
}

#[test]
fn unregistered_field_keeps_its_value() {
    let (_form, instance) = mounted(FormOptions::default());
    let item = FormItem::<Profile>::named("email").validators(validators![
        validators::required("required")
    ]);
    item.mount(&instance).expect("mount item");
    block_on(instance.change_field("email", "")).expect("change");
    assert!(!messages(&instance, "email").is_empty());

    item.unmount(&instance).expect("unmount item");
    assert!(instance.registered_paths().expect("paths").is_empty());
    assert_eq!(instance.field_meta("email").expect("meta"), None);
    assert_eq!(instance.get_field_value("email").expect("email"), Some(json!("")));
    block_on(instance.validate_fields(None)).expect("nothing left to validate");
}

#[test]
fn observers_receive_changes_until_unsubscribed() {
    let instance = FormInstance::<Value>::new(FormOptions::default());
    let values = Arc::new(AtomicUsize::new(0));
    let meta = Arc::new(AtomicUsize::new(0));
    let id = {
        let values = Arc::clone(&values);
        let meta = Arc::clone(&meta);
        instance
            .subscribe(move |event| match event {
                FormEvent::ValuesChanged { .. } => {
                    values.fetch_add(1, Ordering::SeqCst);
                }
                FormEvent::MetaChanged(_) => {
                    meta.fetch_add(1, Ordering::SeqCst);
                }
            })
            .expect("subscribe")
    };

    instance.set_field_value("name", "a").expect("set");
    instance.set_field_value("name", "a").expect("same value");
    instance.touch("name").expect("touch");
    instance.touch("name").expect("touch again");
    assert_eq!(values.load(Ordering::SeqCst), 1);
    assert_eq!(meta.load(Ordering::SeqCst), 1);

    instance.unsubscribe(id).expect("unsubscribe");
    instance.set_field_value("name", "b").expect("set");
    assert_eq!(values.load(Ordering::SeqCst), 1);
}

#[test]
fn values_change_hook_receives_changed_part() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let instance = FormInstance::<Profile>::new(FormOptions::default());
    let _form = {
        let seen = Arc::clone(&seen);
        Form::<Profile>::new(instance.clone())
            .initial_values(base_profile())
            .expect("initial values")
            .on_values_change(move |changed, all| {
                seen.lock()
                    .expect("seen")
                    .push((changed.clone(), all["password"].clone()));
            })
            .mount()
            .expect("mount")
    };

    instance.set_field_value("email", "quiet").expect("programmatic set");
    block_on(instance.change_field("email", "loud")).expect("user change");
    assert_eq!(
        *seen.lock().expect("seen"),
        vec![(json!({ "email": "loud" }), json!("pass"))]
    );
}

#[test]
fn initial_and_submitted_values_are_transformed() {
    let kit = create_form_with::<Profile, Summary>(ItemDefaults::default());
    let submitted = Arc::new(Mutex::new(None));
    let form = {
        let submitted = Arc::clone(&submitted);
        kit.form(kit.use_form())
            .initial_values(base_profile())
            .expect("initial values")
            .transform_initial_values(|mut values| {
                values["tags"] = json!(["a", "b", "c"]);
                values
            })
            .before_submit(|profile: Profile| Summary {
                email: profile.email.to_uppercase(),
                tag_count: profile.tags.len(),
            })
            .on_finish(move |summary| *submitted.lock().expect("submitted") = Some(summary))
            .mount()
            .expect("mount")
    };

    assert!(!form.instance().snapshot().expect("snapshot").is_dirty);
    assert_eq!(
        block_on(form.submit()).expect("submit"),
        SubmitOutcome::Submitted
    );
    assert_eq!(
        *submitted.lock().expect("submitted"),
        Some(Summary {
            email: "USER@EXAMPLE.COM".to_string(),
            tag_count: 3,
        })
    );
}

#[test]
fn form_requires_mount_before_render() {
    let form = Form::<Profile>::new(FormInstance::new(FormOptions::default()));
    assert!(matches!(form.render(), Err(FormError::NotMounted)));
    assert!(matches!(block_on(form.submit()), Err(FormError::NotMounted)));
}

#[test]
fn computed_child_follows_dependencies_only() {
    let kit = create_form::<Profile>();
    let strength = kit
        .observer_item()
        .deps(["password"])
        .computed_child(|deps| {
            Node::new("strength").with_text(deps.str("password").unwrap_or_default().len().to_string())
        });
    let form = kit
        .form(kit.use_form())
        .initial_values(base_profile())
        .expect("initial values")
        .item(kit.item("email").child(crate::widgets::TextInput::new()))
        .item(strength.clone())
        .mount()
        .expect("mount");
    let instance = form.instance().clone();

    let tree = form.render().expect("render");
    assert_eq!(tree.find_by_tag("strength").map(Node::text_content).as_deref(), Some("4"));
    assert_eq!(strength.render_count(), 1);

    block_on(instance.change_field("email", "other@example.com")).expect("change email");
    assert!(!strength.is_stale());
    form.render().expect("render");
    assert_eq!(strength.render_count(), 1);

    block_on(instance.change_field("password", "longer")).expect("change password");
    assert_eq!(strength.update_count(), 1);
    let tree = form.render().expect("render");
    assert_eq!(strength.render_count(), 2);
    assert_eq!(tree.find_by_tag("strength").map(Node::text_content).as_deref(), Some("6"));
}

#[test]
fn kit_defaults_apply_to_created_items() {
    let kit = create_form_with::<Profile, Profile>(ItemDefaults {
        validate_trigger: Some(ValidationMode::OnBlur),
        ..ItemDefaults::default()
    });
    let form = kit
        .form(kit.use_form())
        .initial_values(base_profile())
        .expect("initial values")
        .item(
            kit.item("email")
                .label("Email")
                .validators(validators![validators::required("required")]),
        )
        .mount()
        .expect("mount");
    let instance = form.instance().clone();

    block_on(instance.change_field("email", "")).expect("change");
    assert!(messages(&instance, "email").is_empty());
    block_on(instance.blur_field("email")).expect("blur");
    assert_eq!(messages(&instance, "email"), vec!["required".to_string()]);

    let tree = form.render().expect("render");
    let item = tree.find_by_attr("name", "email").expect("item");
    assert_eq!(item.attr("error"), Some("true"));
    assert_eq!(item.attr("touched"), Some("true"));
}

#[test]
fn options_load_from_toml() {
    let options = FormOptions::from_toml_str(
        "validate_trigger = \"on_blur\"\nvalidate_debounce_ms = 20\n",
    )
    .expect("options");
    assert_eq!(options.validate_trigger, ValidationMode::OnBlur);
    assert_eq!(options.revalidate_dependents, RevalidateMode::OnChange);
    assert_eq!(options.validate_debounce(), Duration::from_millis(20));

    assert!(matches!(
        FormOptions::from_toml_str("validate_trigger = \"sometimes\""),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        FormOptions::from_toml_file("/nonexistent/formbind.toml"),
        Err(ConfigError::Read { .. })
    ));
}
