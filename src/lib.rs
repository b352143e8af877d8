pub mod contracts;
pub mod form;
pub mod pages;
pub mod prelude;
pub mod widgets;

pub use form::{Form, FormError, FormInstance, FormItem, FormOptions, FormResult};
