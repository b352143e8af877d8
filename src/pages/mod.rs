//! Example forms built on the binding layer.

mod login;
mod modify_password;
mod others;
mod request;

pub use login::{LoginPage, LoginParams, LoginVariant};
pub use modify_password::{ModifyPasswordPage, ModifyPasswordParams, ModifyPasswordVariant};
pub use others::{OthersPage, OthersParams};
pub use request::{DEFAULT_REQUEST_DELAY, fake_request};
