mod list;
mod text_input;
mod viewport;

pub use list::{FilterState, ItemList, ListItem};
pub use text_input::TextInput;
pub use viewport::Viewport;
