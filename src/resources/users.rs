use serde::{Deserialize, Serialize};

use crate::resource::{RecordId, Resource, RowAction, actions_column, lenient};
use crate::table::Column;
use crate::ui::FormField;

/// An account of the admin site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::string")]
    pub kind: String,
}

impl Resource for User {
    const KEY: &'static str = "users";
    const TITLE: &'static str = "Users";
    const ITEM: &'static str = "User";
    const DESCRIPTION: &'static str = "Overview of all Users";
    const PATH: &'static str = "api/users";

    fn id(&self) -> RecordId {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::field("name", "Name", |u: &Self| u.name.as_str().into()),
            Column::field("email", "Email", |u: &Self| u.email.as_str().into()),
            Column::field("type", "Type", |u: &Self| u.kind.as_str().into()),
            actions_column(),
        ]
    }

    fn actions(&self) -> Vec<RowAction> {
        vec![RowAction::Edit]
    }

    fn form_fields() -> &'static [FormField] {
        const FIELDS: &[FormField] = &[
            FormField::required("name", "Name"),
            FormField::required("email", "Email"),
            FormField::required("type", "Type"),
        ];
        FIELDS
    }

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("type", self.kind.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_type_field_and_copy_json() {
        let user: User = serde_json::from_value(json!({
            "id": 1, "name": "Admin", "email": "admin@example.com", "type": "admin"
        }))
        .unwrap();
        assert_eq!(user.kind, "admin");
        assert_eq!(serde_json::to_value(&user).unwrap()["type"], "admin");
    }

    #[test]
    fn test_users_can_be_created_and_edited() {
        assert!(User::can_create());
        let user: User = serde_json::from_value(json!({
            "id": 2, "name": "Maria", "email": "maria@example.com", "type": "agent"
        }))
        .unwrap();
        assert_eq!(user.actions(), vec![RowAction::Edit]);
        assert_eq!(
            user.form_values(),
            vec![
                ("name", "Maria".to_string()),
                ("email", "maria@example.com".to_string()),
                ("type", "agent".to_string()),
            ]
        );
        let keys: Vec<_> = User::form_fields().iter().map(|f| f.key).collect();
        assert_eq!(keys, ["name", "email", "type"]);

        let table = crate::table::DataTable::new(User::columns(), vec![user]);
        assert_eq!(table.render_page()[0][3], "Edit");
    }
}
