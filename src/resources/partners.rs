use serde::{Deserialize, Serialize};

use super::file_name;
use crate::resource::{RecordId, Resource, RowAction, actions_column, lenient};
use crate::table::Column;
use crate::ui::FormField;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub image: Option<String>,
}

impl Resource for Partner {
    const KEY: &'static str = "partners";
    const TITLE: &'static str = "Partners";
    const ITEM: &'static str = "Partner";
    const DESCRIPTION: &'static str = "Overview of all Partners";
    const PATH: &'static str = "api/partners";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("name", "Name", |p: &Self| p.name.as_str().into()),
            Column::rendered("image", "Logo", |p: &Self| file_name(p.image.as_deref(), "No logo")),
            actions_column(),
        ]
    }

    fn actions(&self) -> Vec<RowAction> {
        vec![RowAction::Edit, RowAction::Delete]
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[FormField::required("name", "Name")];
        FIELDS
    }

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone())]
    }
}
