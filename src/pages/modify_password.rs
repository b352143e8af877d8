use serde::{Deserialize, Serialize};

use crate::contracts::Control;
use crate::form::{
    FieldLens, Form, FormModel, FormOptions, FormResult, create_form, validators,
};
use crate::validators;
use crate::widgets::{Button, Disclosure, Node, TextInput, card, dialog, event_handler};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FormModel)]
pub struct ModifyPasswordParams {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModifyPasswordVariant {
    Card,
    Dialog,
}

/// Change-password form. The new password must differ from the old one and
/// the confirmation must repeat it, so both rule lists are rebuilt from
/// their dependencies.
pub struct ModifyPasswordPage {
    form: Form<ModifyPasswordParams>,
    variant: ModifyPasswordVariant,
    visible: Disclosure,
}

impl ModifyPasswordPage {
    pub fn new(
        variant: ModifyPasswordVariant,
        options: FormOptions,
        on_finish: impl Fn(ModifyPasswordParams) + Send + Sync + 'static,
    ) -> FormResult<Self> {
        let kit = create_form::<ModifyPasswordParams>().with_options(options);
        let fields = ModifyPasswordParams::fields();
        let visible = Disclosure::default();

        let mut form = kit
            .form(kit.use_form())
            .initial_values(ModifyPasswordParams::default())?
            .on_finish(on_finish)
            .item(
                kit.item(fields.old_password().path())
                    .label("Old Password")
                    .validators(validators![validators::required(
                        "Please input your old password"
                    )])
                    .child(TextInput::password()),
            )
            .item(
                kit.item(fields.new_password().path())
                    .label("New Password")
                    .deps([fields.old_password().path()])
                    .computed_validators(move |deps| {
                        validators![
                            validators::required("Please input the new password"),
                            validators::min_length(8, "Password should not less then 8"),
                            validators::max_length(20, "Password should not more then 20"),
                            validators::password_format(
                                "Password must include english and number"
                            ),
                            validators::should_not_be_equal(
                                deps.get(fields.old_password().path()).cloned(),
                                "Password should not be equal to old password",
                            ),
                        ]
                    })
                    .child(TextInput::password()),
            )
            .item(
                kit.item(fields.confirm_new_password().path())
                    .label("Confirm New Password")
                    .deps([fields.new_password().path()])
                    .computed_validators(move |deps| {
                        validators![
                            validators::required("Please input password"),
                            validators::should_be_equal(
                                deps.get(fields.new_password().path()).cloned(),
                                "Not the same as above new password",
                            ),
                        ]
                    })
                    .child(TextInput::password()),
            )
            .child(Button::submit("Confirm").to_node());
        if variant == ModifyPasswordVariant::Dialog {
            let closer = visible.clone();
            form = form.child(Button::new("Cancel").on_click(move || closer.close()).to_node());
        }

        Ok(Self {
            form: form.mount()?,
            variant,
            visible,
        })
    }

    pub fn form(&self) -> &Form<ModifyPasswordParams> {
        &self.form
    }

    pub fn visible(&self) -> &Disclosure {
        &self.visible
    }

    pub fn render(&self) -> FormResult<Node> {
        if self.variant == ModifyPasswordVariant::Card {
            return Ok(card("Modify Password", self.form.render()?));
        }
        let opener = self.visible.clone();
        let closer = self.visible.clone();
        let body = if self.visible.is_open() {
            self.form.render()?
        } else {
            Node::fragment()
        };
        Ok(Node::fragment()
            .with_child(
                Button::new("Modify Password")
                    .on_click(move || opener.open())
                    .render(None),
            )
            .with_child(dialog(
                "Modify Password",
                self.visible.is_open(),
                event_handler(move || closer.close()),
                body,
            )))
    }
}
