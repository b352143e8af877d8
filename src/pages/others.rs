use serde::{Deserialize, Serialize};

use crate::form::{FieldLens, Form, FormModel, FormOptions, FormResult, create_form};
use crate::widgets::{
    Button, Checkbox, Disclosure, Node, RadioGroup, Select, SelectOption, TextInput, dialog,
    event_handler,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FormModel)]
pub struct OthersParams {
    pub nickname: String,
    pub checkbox: bool,
    pub select: String,
    pub radio: Option<String>,
}

impl Default for OthersParams {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            checkbox: false,
            select: "react".to_owned(),
            radio: None,
        }
    }
}

/// Non-text controls bound through the same items: a checkbox bound to
/// `checked`, a select and a radio group.
pub struct OthersPage {
    form: Form<OthersParams>,
    visible: Disclosure,
}

impl OthersPage {
    pub fn new(
        options: FormOptions,
        on_finish: impl Fn(OthersParams) + Send + Sync + 'static,
    ) -> FormResult<Self> {
        let kit = create_form::<OthersParams>().with_options(options);
        let fields = OthersParams::fields();
        let visible = Disclosure::default();
        let closer = visible.clone();

        let form = kit
            .form(kit.use_form())
            .initial_values(OthersParams::default())?
            .on_finish(on_finish)
            .item(
                kit.item(fields.nickname().path())
                    .label("Nick Name")
                    .child(TextInput::new()),
            )
            .item(
                kit.item(fields.checkbox().path())
                    .label("CheckBox")
                    .child(Checkbox::new("")),
            )
            .item(
                kit.item(fields.select().path()).label("Select").child(Select::new([
                    SelectOption::new("vue", "Vue"),
                    SelectOption::new("react", "React"),
                    SelectOption::new("angular", "Angular"),
                ])),
            )
            .item(kit.item(fields.radio().path()).label("Radio").child(RadioGroup::new([
                SelectOption::new("buy", "Buy"),
                SelectOption::new("sell", "Sell"),
            ])))
            .child(Button::submit("Login").to_node())
            .child(Button::new("Cancel").on_click(move || closer.close()).to_node())
            .mount()?;
        Ok(Self { form, visible })
    }

    pub fn form(&self) -> &Form<OthersParams> {
        &self.form
    }

    pub fn visible(&self) -> &Disclosure {
        &self.visible
    }

    pub fn render(&self) -> FormResult<Node> {
        let opener = self.visible.clone();
        let closer = self.visible.clone();
        let body = if self.visible.is_open() {
            self.form.render()?
        } else {
            Node::fragment()
        };
        Ok(Node::fragment()
            .with_child(Button::new("Others").on_click(move || opener.open()).to_node())
            .with_child(dialog(
                "Others",
                self.visible.is_open(),
                event_handler(move || closer.close()),
                body,
            )))
    }
}
