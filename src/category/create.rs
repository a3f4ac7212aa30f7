//! Category creation form and endpoint, and the form shared with editing.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    category::{CategoryState, db::create_category, domain::CategoryFormData},
    endpoints,
    html::{
        FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, checkbox_input, submit_button,
    },
    notice::{Notice, refresh_response},
};

/// Where a category form is submitted to.
pub(super) enum FormTarget<'a> {
    /// POST a new category.
    Create,
    /// PUT changes to the category at this URL.
    Update(&'a str),
}

/// Render the category form with an optional error message for the name field.
pub(super) fn category_form_view(
    target: FormTarget<'_>,
    form: &CategoryFormData,
    name_error: Option<&str>,
) -> Markup {
    let (hx_post, hx_put, submit_text) = match target {
        FormTarget::Create => (Some(endpoints::POST_CATEGORY), None, "Add category"),
        FormTarget::Update(url) => (None, Some(url), "Save"),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Category name"
                    required
                    autofocus
                    value=(form.name)
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(error_message) = name_error {
                    p class=(FORM_ERROR_STYLE) { (error_message) }
                }
            }

            (checkbox_input("mute", "Mute", form.mute.is_some()))
            (checkbox_input("active", "Active", form.active.is_some()))

            (submit_button(submit_text))
        }
    }
}

/// Wrap a form with a title for display in the off-canvas panel.
pub(super) fn offcanvas_form_view(title: &str, form: Markup) -> Markup {
    html! {
        h2 class="mb-4 text-lg font-semibold text-gray-900 dark:text-white" { (title) }
        (form)
    }
}

/// Render the form for creating a category.
pub async fn get_new_category_form() -> Response {
    offcanvas_form_view(
        "Add category",
        category_form_view(FormTarget::Create, &CategoryFormData::new_category(), None),
    )
    .into_response()
}

/// Create a category owned by the user who submitted the form.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(error) => {
            return category_form_view(FormTarget::Create, &form, Some(&error.to_string()))
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_category(fields, user_id, &connection) {
        Ok(_) => refresh_response(Some(Notice::success("Category added successfully"))),
        Err(error @ Error::DuplicateCategoryName) => {
            category_form_view(FormTarget::Create, &form, Some(&error.to_string())).into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod new_category_form_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_checkbox, assert_form_input,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_fragment,
        },
    };

    use super::get_new_category_form;

    #[tokio::test]
    async fn render_form() {
        let response = get_new_category_form().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_CATEGORY, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_checkbox(&form, "mute", false);
        assert_form_checkbox(&form, "active", true);
        assert_form_submit_button_with_text(&form, "Add category");
    }
}
