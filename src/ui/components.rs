mod column_picker;
mod confirm_dialog;
mod form;
mod list;
mod table;
mod text_input;

pub use column_picker::{ColumnPicker, ColumnPickerEvent};
pub use confirm_dialog::{ConfirmDialog, ConfirmEvent};
pub use form::{Form, FormEvent, FormField};
pub use list::{List, ListEvent, ListRow};
pub use table::{Table, TableEvent};
pub use text_input::{TextInput, TextInputEvent};
