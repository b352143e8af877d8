mod button;
mod checkbox;
mod disclosure;
mod input;
mod layout;
mod node;
mod select;

pub use button::{Button, ButtonType};
pub use checkbox::Checkbox;
pub use disclosure::Disclosure;
pub use input::{InputKind, TextInput};
pub use layout::{card, dialog};
pub use node::{ChangeHandler, EventFuture, EventHandler, Node, change_handler, event_handler};
pub use select::{RadioGroup, Select, SelectOption};
