//! Transaction categories that can be owned by one user and shared with others.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod ownership;
mod share;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use create::{create_category_endpoint, get_new_category_form};
pub use db::create_category_tables;
pub use delete::delete_category_endpoint;
pub use edit::{get_edit_category_form, update_category_endpoint};
pub use list::{
    get_active_categories_table, get_archived_categories_table, get_categories_list,
    get_categories_page,
};
pub use ownership::take_category_ownership_endpoint;
pub use share::{get_share_category_form, share_category_endpoint};

/// Message shown when a user tries to change a category owned by someone else.
const NOT_OWNER_MESSAGE: &str = "Only the owner can edit this";

/// The state needed by the category pages and endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[cfg(test)]
mod test_helpers {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        auth::UserID,
        category::{
            CategoryState,
            db::{create_category, get_category, save_sharing},
            domain::{Category, CategoryFields, CategoryName},
        },
        shared_object::{Sharing, Visibility},
        test_utils::get_test_connection,
    };

    pub(crate) fn get_category_state() -> CategoryState {
        CategoryState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    pub(crate) fn insert_category(
        name: &str,
        active: bool,
        owner: UserID,
        connection: &Connection,
    ) -> Category {
        create_category(
            CategoryFields {
                name: CategoryName::new_unchecked(name),
                mute: false,
                active,
            },
            owner,
            connection,
        )
        .expect("Could not create test category")
    }

    pub(crate) fn insert_unowned_category(name: &str, connection: &Connection) -> Category {
        connection
            .execute("INSERT INTO category (name) VALUES (?1)", [name])
            .expect("Could not insert unowned category");

        get_category(connection.last_insert_rowid(), connection)
            .expect("Could not get unowned category")
    }

    /// Insert an active category that every user can see but only `owner` can edit.
    pub(crate) fn insert_public_category(
        name: &str,
        owner: UserID,
        connection: &Connection,
    ) -> Category {
        let category = insert_category(name, true, owner, connection);
        save_sharing(
            category.id,
            &Sharing {
                owner: Some(owner),
                visibility: Visibility::Public,
                shared_with: Vec::new(),
            },
            connection,
        )
        .expect("Could not make test category public");

        get_category(category.id, connection).expect("Could not get public category")
    }
}
