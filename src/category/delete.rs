//! Category deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::Response,
};

use crate::{
    Error,
    auth::UserID,
    category::{
        CategoryState,
        db::{delete_category, get_visible_category, remove_shared_with},
        domain::CategoryId,
    },
    notice::{Notice, refresh_response},
    shared_object::SharedObject,
};

/// Delete a category, or stop sharing it with the user if they are a recipient.
///
/// Only recipients are kept from deleting a category, so any other user who
/// can see it deletes it outright. Categories hidden from the user are not found.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let category = match get_visible_category(category_id, user_id, &connection) {
        Ok(category) => category,
        Err(Error::NotFound) => return Error::DeleteMissingCategory.into_alert_response(),
        Err(error) => return error.into_alert_response(),
    };

    if category.is_recipient(user_id) {
        return match remove_shared_with(category_id, user_id, &connection) {
            Ok(()) => refresh_response(Some(Notice::success("Item no longer shared with you"))),
            Err(error) => {
                tracing::error!(
                    "could not stop sharing category {category_id} with user {user_id}: {error}"
                );
                error.into_alert_response()
            }
        };
    }

    match delete_category(category_id, &connection) {
        Ok(()) => refresh_response(Some(Notice::success("Category deleted successfully"))),
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}
