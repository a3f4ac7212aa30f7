//! Category editing form and endpoint.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    category::{
        CategoryState, NOT_OWNER_MESSAGE,
        create::{FormTarget, category_form_view, offcanvas_form_view},
        db::{get_visible_category, update_category},
        domain::{CategoryFormData, CategoryId},
    },
    endpoints::{self, format_endpoint},
    notice::{Notice, refresh_response},
    shared_object::SharedObject,
};

/// Render the form for editing a category.
///
/// Users who cannot edit the category get an error notice instead of the form.
pub async fn get_edit_category_form(
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
        return refresh_response(Some(Notice::error(NOT_OWNER_MESSAGE)));
    }

    let update_url = format_endpoint(endpoints::PUT_CATEGORY, category_id);
    offcanvas_form_view(
        "Edit category",
        category_form_view(
            FormTarget::Update(&update_url),
            &CategoryFormData::from_category(&category),
            None,
        ),
    )
    .into_response()
}

/// Save the changes to a category.
///
/// The category is left unchanged if the user is not allowed to edit it.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CategoryFormData>,
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
        tracing::warn!("user {user_id} tried to edit category {category_id} owned by another user");
        return refresh_response(Some(Notice::error(NOT_OWNER_MESSAGE)));
    }

    let update_url = format_endpoint(endpoints::PUT_CATEGORY, category_id);
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(error) => {
            return category_form_view(
                FormTarget::Update(&update_url),
                &form,
                Some(&error.to_string()),
            )
            .into_response();
        }
    };

    match update_category(category_id, &fields, &connection) {
        Ok(()) => refresh_response(Some(Notice::success("Category updated successfully"))),
        Err(error @ Error::DuplicateCategoryName) => category_form_view(
            FormTarget::Update(&update_url),
            &form,
            Some(&error.to_string()),
        )
        .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}


#[cfg(test)]
mod update_category_endpoint_tests {
    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        category::{
            db::get_category,
            domain::{CategoryFormData, CategoryName},
            test_helpers::{
                get_category_state, insert_category, insert_public_category,
                insert_unowned_category,
            },
        },
        notice::NoticeLevel,
        test_utils::{
            assert_form_error_message, assert_toast, assert_trigger_events, insert_test_user,
            must_get_form, parse_html_fragment,
        },
    };

    use super::update_category_endpoint;

    fn archive_form(name: &str) -> CategoryFormData {
        CategoryFormData {
            name: name.to_owned(),
            mute: Some("on".to_owned()),
            active: None,
        }
    }

    #[tokio::test]
    async fn owner_can_update_category() {
        let state = get_category_state();
        let user = insert_test_user("ada@example.com", &state.db_connection.lock().unwrap());
        let category =
            insert_category("Groceries", true, user.id, &state.db_connection.lock().unwrap());

        let response = update_category_endpoint(
            Path(category.id),
            State(state.clone()),
            Extension(user.id),
            Form(archive_form("Food")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_trigger_events(&response, &["updated", "hide_offcanvas", "toast"]);
        assert_toast(&response, NoticeLevel::Success, "Category updated successfully");
        let got = get_category(category.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.name, CategoryName::new_unchecked("Food"));
        assert!(got.mute);
        assert!(!got.active);
    }

    #[tokio::test]
    async fn anyone_can_update_unowned_category() {
        let state = get_category_state();
        let user = insert_test_user("ada@example.com", &state.db_connection.lock().unwrap());
        let category = insert_unowned_category("Legacy", &state.db_connection.lock().unwrap());

        let response = update_category_endpoint(
            Path(category.id),
            State(state.clone()),
            Extension(user.id),
            Form(archive_form("Old stuff")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let got = get_category(category.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.name.as_ref(), "Old stuff");
        assert_eq!(got.sharing.owner, None);
    }

    #[tokio::test]
    async fn non_owner_cannot_update_category() {
        let state = get_category_state();
        let (alice, bob) = {
            let connection = state.db_connection.lock().unwrap();
            (
                insert_test_user("alice@example.com", &connection),
                insert_test_user("bob@example.com", &connection),
            )
        };
        let category =
            insert_public_category("Groceries", alice.id, &state.db_connection.lock().unwrap());

        let response = update_category_endpoint(
            Path(category.id),
            State(state.clone()),
            Extension(bob.id),
            Form(archive_form("Hijacked")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_toast(&response, NoticeLevel::Error, "Only the owner can edit this");
        let got = get_category(category.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got, category);
    }

    #[tokio::test]
    async fn other_users_private_category_is_not_updated() {
        let state = get_category_state();
        let (alice, bob) = {
            let connection = state.db_connection.lock().unwrap();
            (
                insert_test_user("alice@example.com", &connection),
                insert_test_user("bob@example.com", &connection),
            )
        };
        let category =
            insert_category("Secret", true, alice.id, &state.db_connection.lock().unwrap());

        let response = update_category_endpoint(
            Path(category.id),
            State(state.clone()),
            Extension(bob.id),
            Form(archive_form("Hijacked")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let got = get_category(category.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got, category);
    }

    #[tokio::test]
    async fn update_fails_on_empty_name() {
        let state = get_category_state();
        let user = insert_test_user("ada@example.com", &state.db_connection.lock().unwrap());
        let category =
            insert_category("Groceries", true, user.id, &state.db_connection.lock().unwrap());

        let response = update_category_endpoint(
            Path(category.id),
            State(state.clone()),
            Extension(user.id),
            Form(archive_form("")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(&must_get_form(&html), "Category name cannot be empty");
        let got = get_category(category.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got, category);
    }

    #[tokio::test]
    async fn update_fails_on_duplicate_name() {
        let state = get_category_state();
        let user = insert_test_user("ada@example.com", &state.db_connection.lock().unwrap());
        let category = {
            let connection = state.db_connection.lock().unwrap();
            insert_category("Rent", true, user.id, &connection);
            insert_category("Groceries", true, user.id, &connection)
        };

        let response = update_category_endpoint(
            Path(category.id),
            State(state),
            Extension(user.id),
            Form(archive_form("Rent")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(
            &must_get_form(&html),
            "A category with this name already exists",
        );
    }

    #[tokio::test]
    async fn update_missing_category_returns_not_found() {
        let state = get_category_state();
        let user = insert_test_user("ada@example.com", &state.db_connection.lock().unwrap());

        let response = update_category_endpoint(
            Path(42),
            State(state),
            Extension(user.id),
            Form(archive_form("Food")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
