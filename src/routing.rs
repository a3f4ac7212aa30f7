//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_active_categories_table,
        get_archived_categories_table, get_categories_list, get_categories_page,
        get_edit_category_form, get_new_category_form, get_share_category_form,
        share_category_endpoint, take_category_ownership_endpoint, update_category_endpoint,
    },
    endpoints,
    htmx::htmx_only,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    settings::{get_settings_page, update_settings},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .merge(
            Router::new()
                .route(endpoints::LOG_IN_API, post(post_log_in))
                .route(endpoints::USERS, post(register_user))
                .layer(middleware::from_fn(htmx_only)),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // Fragments and API routes are only requested by HTMX, so auth redirects
    // need the HX-Redirect header. Non-HTMX requests get a 404 before auth is checked.
    let htmx_routes = Router::new()
        .route(endpoints::CATEGORIES_LIST, get(get_categories_list))
        .route(
            endpoints::ACTIVE_CATEGORIES_TABLE,
            get(get_active_categories_table),
        )
        .route(
            endpoints::ARCHIVED_CATEGORIES_TABLE,
            get(get_archived_categories_table),
        )
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_form))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_form))
        .route(endpoints::SHARE_CATEGORY_VIEW, get(get_share_category_form))
        .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
        .route(
            endpoints::PUT_CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(endpoints::SHARE_CATEGORY, put(share_category_endpoint))
        .route(
            endpoints::TAKE_CATEGORY_OWNERSHIP,
            get(take_category_ownership_endpoint),
        )
        .route(endpoints::PUT_SETTINGS, put(update_settings))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx))
        .layer(middleware::from_fn(htmx_only));

    protected_routes
        .merge(htmx_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the categories page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::CATEGORIES_VIEW)
}
