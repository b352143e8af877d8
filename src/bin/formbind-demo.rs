use std::env;
use std::time::Duration;

use formbind::FormOptions;
use formbind::form::SubmitOutcome;
use formbind::pages::{ModifyPasswordPage, ModifyPasswordParams, ModifyPasswordVariant, fake_request};
use formbind::widgets::Node;
use futures::channel::mpsc;
use futures::executor::block_on;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

const CONFIG_ENV: &str = "FORMBIND_CONFIG";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("formbind=info")))
        .init();

    let options = match env::var_os(CONFIG_ENV) {
        Some(path) => FormOptions::from_toml_file(path)?,
        None => FormOptions::default(),
    };
    tracing::info!(?options, "starting modify password demo");

    let (sender, mut finished) = mpsc::unbounded::<ModifyPasswordParams>();
    let page = ModifyPasswordPage::new(ModifyPasswordVariant::Card, options, move |params| {
        if let Err(error) = sender.unbounded_send(params) {
            tracing::warn!(%error, "demo receiver is gone");
        }
    })?;

    block_on(async {
        for (name, value) in [
            ("old_password", "secret1"),
            ("new_password", "secret1"),
            ("confirm_new_password", "secret1"),
        ] {
            type_into(&page.render()?, name, value).await;
        }
        report(page.form().submit().await?);

        type_into(&page.render()?, "new_password", "newpass12").await;
        type_into(&page.render()?, "confirm_new_password", "newpass12").await;
        report(page.form().submit().await?);

        if let Ok(Some(params)) = finished.try_next() {
            fake_request(params, Duration::from_millis(200)).await;
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

async fn type_into(tree: &Node, name: &str, value: &str) {
    let control = tree
        .find_by_attr("name", name)
        .and_then(|item| item.find(&|node: &Node| node.has_on_change()));
    match control {
        Some(control) => {
            control.input(value).await;
        }
        None => tracing::warn!(field = name, "no bound control"),
    }
}

fn report(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Submitted => tracing::info!("password changed"),
        SubmitOutcome::Blocked(info) => {
            for field in &info.error_fields {
                for error in &field.errors {
                    tracing::info!(field = %field.name, %error, "rejected");
                }
            }
        }
    }
}
