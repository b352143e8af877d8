use serde::{Deserialize, Serialize};

use crate::contracts::Control;
use crate::form::{
    FieldLens, Form, FormModel, FormOptions, FormResult, create_form, validators,
};
use crate::validators;
use crate::widgets::{Button, Disclosure, Node, TextInput, card, dialog, event_handler};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FormModel)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoginVariant {
    Card,
    /// Hidden behind a trigger button until opened.
    Dialog,
}

pub struct LoginPage {
    form: Form<LoginParams>,
    variant: LoginVariant,
    visible: Disclosure,
}

impl LoginPage {
    pub fn new(
        variant: LoginVariant,
        options: FormOptions,
        on_finish: impl Fn(LoginParams) + Send + Sync + 'static,
    ) -> FormResult<Self> {
        let kit = create_form::<LoginParams>().with_options(options);
        let fields = LoginParams::fields();
        let visible = Disclosure::default();

        let mut form = kit
            .form(kit.use_form())
            .initial_values(LoginParams::default())?
            .on_finish(on_finish)
            .item(
                kit.item(fields.username().path())
                    .label("Username")
                    .validators(validators![validators::required("Please input username")])
                    .child(TextInput::new()),
            )
            .item(
                kit.item(fields.password().path())
                    .label("Password")
                    .validators(validators![
                        validators::required("Please input password"),
                        validators::password_format("Password must include english and number"),
                    ])
                    .child(TextInput::password()),
            )
            .child(Button::submit("Login").to_node());
        if variant == LoginVariant::Dialog {
            let closer = visible.clone();
            form = form.child(Button::new("Cancel").on_click(move || closer.close()).to_node());
        }

        Ok(Self {
            form: form.mount()?,
            variant,
            visible,
        })
    }

    pub fn form(&self) -> &Form<LoginParams> {
        &self.form
    }

    pub fn visible(&self) -> &Disclosure {
        &self.visible
    }

    pub fn render(&self) -> FormResult<Node> {
        match self.variant {
            LoginVariant::Card => Ok(card("Login", self.form.render()?)),
            LoginVariant::Dialog => {
                let opener = self.visible.clone();
                let closer = self.visible.clone();
                let body = if self.visible.is_open() {
                    self.form.render()?
                } else {
                    Node::fragment()
                };
                Ok(Node::fragment()
                    .with_child(
                        Button::new("Login Form")
                            .on_click(move || opener.open())
                            .render(None),
                    )
                    .with_child(dialog(
                        "Login",
                        self.visible.is_open(),
                        event_handler(move || closer.close()),
                        body,
                    )))
            }
        }
    }
}
