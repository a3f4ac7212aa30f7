//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/categories/{category_id}/edit', use [format_endpoint].

/// The root route which redirects to the categories page.
pub const ROOT: &str = "/";
/// The page for listing and managing transaction categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The fragment with the active/archived tabs and the table loader.
pub const CATEGORIES_LIST: &str = "/categories/list";
/// The fragment with the table of active categories.
pub const ACTIVE_CATEGORIES_TABLE: &str = "/categories/table/active";
/// The fragment with the table of archived categories.
pub const ARCHIVED_CATEGORIES_TABLE: &str = "/categories/table/archived";
/// The fragment with the form for creating a new category.
pub const NEW_CATEGORY_VIEW: &str = "/categories/new";
/// The fragment with the form for editing an existing category.
pub const EDIT_CATEGORY_VIEW: &str = "/categories/{category_id}/edit";
/// The fragment with the form for sharing a category with other users.
pub const SHARE_CATEGORY_VIEW: &str = "/categories/{category_id}/share";
/// The page for editing the user's settings.
pub const SETTINGS_VIEW: &str = "/settings";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to update a category.
pub const PUT_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to delete a category, or to stop it being shared with the user.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to save who a category is shared with.
pub const SHARE_CATEGORY: &str = "/api/categories/{category_id}/share";
/// The route to claim an unowned category.
pub const TAKE_CATEGORY_OWNERSHIP: &str = "/api/categories/{category_id}/take_ownership";
/// The route to save the user's settings.
pub const PUT_SETTINGS: &str = "/api/settings";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/categories/{category_id}', '{category_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES_LIST);
        assert_endpoint_is_valid_uri(endpoints::ACTIVE_CATEGORIES_TABLE);
        assert_endpoint_is_valid_uri(endpoints::ARCHIVED_CATEGORIES_TABLE);
        assert_endpoint_is_valid_uri(endpoints::NEW_CATEGORY_VIEW);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::EDIT_CATEGORY_VIEW, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::SHARE_CATEGORY_VIEW, 1));
        assert_endpoint_is_valid_uri(endpoints::SETTINGS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REGISTER_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::POST_CATEGORY);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::PUT_CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::DELETE_CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::SHARE_CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TAKE_CATEGORY_OWNERSHIP, 1));
        assert_endpoint_is_valid_uri(endpoints::PUT_SETTINGS);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/api/categories/{category_id}/share", 42);

        assert_eq!(formatted_path, "/api/categories/42/share");
    }
}
