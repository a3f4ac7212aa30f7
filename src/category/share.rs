//! Choosing who can see a category.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{
    Error,
    auth::UserID,
    category::{
        CategoryState, NOT_OWNER_MESSAGE,
        create::offcanvas_form_view,
        db::{get_visible_category, save_sharing},
        domain::CategoryId,
    },
    endpoints::{self, format_endpoint},
    notice::{Notice, refresh_response},
    shared_object::{
        ShareFormData, ShareFormErrors, SharedObject, get_share_candidates, share_form_view,
    },
};

/// Render the sharing form for a category.
pub async fn get_share_category_form(
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
        Err(error) => return error.into_alert_response(),
    };

    if !category.can_edit(user_id) {
        tracing::warn!("user {user_id} tried to share category {category_id} owned by another user");
        return refresh_response(Some(Notice::error(NOT_OWNER_MESSAGE)));
    }

    let candidates = match get_share_candidates(user_id, &connection) {
        Ok(candidates) => candidates,
        Err(error) => {
            tracing::error!("could not get users to share category {category_id} with: {error}");
            return error.into_alert_response();
        }
    };

    let share_url = format_endpoint(endpoints::SHARE_CATEGORY, category_id);
    let title = format!("Share {}", category.name);

    offcanvas_form_view(
        &title,
        share_form_view(
            &share_url,
            &ShareFormData::from_sharing(&category.sharing),
            &candidates,
            &ShareFormErrors::default(),
        ),
    )
    .into_response()
}

/// Save who can see a category.
///
/// Sharing an unowned category makes the user who shared it its owner.
pub async fn share_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ShareFormData>,
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
        Err(error) => return error.into_alert_response(),
    };

    if !category.can_edit(user_id) {
        tracing::warn!("user {user_id} tried to share category {category_id} owned by another user");
        return refresh_response(Some(Notice::error(NOT_OWNER_MESSAGE)));
    }

    let candidates = match get_share_candidates(user_id, &connection) {
        Ok(candidates) => candidates,
        Err(error) => {
            tracing::error!("could not get users to share category {category_id} with: {error}");
            return error.into_alert_response();
        }
    };

    let update = match form.validate(&candidates) {
        Ok(update) => update,
        Err(errors) => {
            let share_url = format_endpoint(endpoints::SHARE_CATEGORY, category_id);
            return share_form_view(&share_url, &form, &candidates, &errors).into_response();
        }
    };

    let sharing = category.sharing.with_update(update, user_id);

    match save_sharing(category_id, &sharing, &connection) {
        Ok(()) => refresh_response(Some(Notice::success("Configuration saved successfully"))),
        Err(error) => {
            tracing::error!("could not save sharing for category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}
