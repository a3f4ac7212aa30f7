//! Claiming categories that have no owner.

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
        db::{get_visible_category, take_ownership},
        domain::CategoryId,
    },
    notice::{Notice, refresh_response},
};

/// Make the user the owner of an unowned category and make it private.
///
/// Does nothing if the category already has an owner.
pub async fn take_category_ownership_endpoint(
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

    if let Err(error) = get_visible_category(category_id, user_id, &connection) {
        return error.into_alert_response();
    }

    match take_ownership(category_id, user_id, &connection) {
        Ok(true) => refresh_response(Some(Notice::success("Ownership taken successfully"))),
        Ok(false) => refresh_response(None),
        Err(error) => {
            tracing::error!("could not take ownership of category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}
