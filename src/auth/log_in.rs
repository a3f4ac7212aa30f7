//! The log-in page and the endpoint that checks credentials and sets the auth cookie.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use email_address::EmailAddress;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, User,
    auth::{
        invalidate_auth_cookie, redirect::normalize_redirect_url, set_auth_cookie,
        user::get_user_by_email,
    },
    endpoints,
    html::{
        FORM_ERROR_STYLE, LINK_STYLE, base, checkbox_input, email_input, log_in_register,
        password_input, submit_button,
    },
    timezone::get_local_offset,
};

/// How long the auth cookie lasts when the user ticks "remember me".
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to log in or register a user.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long a new session lasts without "remember me".
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The fields submitted with the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,
    pub password: String,
    /// Present when the "remember me" checkbox is ticked.
    pub remember_me: Option<String>,
    /// Where to send the user after logging in.
    pub redirect_url: Option<String>,
}

/// Why a log-in attempt was turned down.
#[derive(Debug, PartialEq)]
enum LogInError {
    /// The email is unknown, the password is wrong or the account is disabled.
    /// These cases share one message so the form does not reveal which emails are registered.
    InvalidCredentials,
    /// Something went wrong on the server.
    Internal,
}

impl LogInError {
    fn message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Incorrect email or password.",
            Self::Internal => "An internal error occurred. Please try again later.",
        }
    }
}

/// Find the active user with `email` and check their password.
fn check_credentials(
    email: &str,
    password: &str,
    connection: &Connection,
) -> Result<User, LogInError> {
    let email = email
        .parse::<EmailAddress>()
        .map_err(|_| LogInError::InvalidCredentials)?;

    let user = get_user_by_email(&email, connection).map_err(|error| match error {
        Error::NotFound => LogInError::InvalidCredentials,
        error => {
            tracing::error!("could not look up user while logging in: {error}");
            LogInError::Internal
        }
    })?;

    match user.password_hash.verify(password) {
        Ok(true) if user.is_active => Ok(user),
        Ok(_) => Err(LogInError::InvalidCredentials),
        Err(error) => {
            tracing::error!("could not verify password while logging in: {error}");
            Err(LogInError::Internal)
        }
    }
}

/// Keep `raw_url` only if it points to a page on this site.
fn safe_redirect_url(raw_url: Option<&str>) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Ignoring unsafe redirect URL: {raw_url}");
    }

    redirect_url
}

fn log_in_form(email: &str, error: Option<&LogInError>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email, None))
            (password_input("", 0, None))
            (checkbox_input("remember_me", "Keep me logged in for one week", false))

            @if let Some(error) = error {
                p class=(FORM_ERROR_STYLE) { (error.message()) }
            }

            (submit_button("Log in"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Register here"
                }
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = safe_redirect_url(query.redirect_url.as_deref());
    let form = log_in_form("", None, redirect_url.as_deref());

    base("Log In", &log_in_register("Log in to your account", &form)).into_response()
}

/// Log a user in.
///
/// Sets the auth cookie and sends the client to the page it came from, or the
/// categories page. The form is sent back with an error if the credentials are wrong.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInData>,
) -> Response {
    let redirect_url = safe_redirect_url(form.redirect_url.as_deref());

    let result = match state.db_connection.lock() {
        Ok(connection) => check_credentials(&form.email, &form.password, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(LogInError::Internal)
        }
    };

    let user = match result {
        Ok(user) => user,
        Err(error) => {
            return log_in_form(&form.email, Some(&error), redirect_url.as_deref())
                .into_response();
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let cookie_duration = match form.remember_me {
        Some(_) => REMEMBER_ME_COOKIE_DURATION,
        None => state.cookie_duration,
    };

    match set_auth_cookie(jar.clone(), user.id, cookie_duration, local_offset) {
        Ok(jar) => {
            let redirect_url = redirect_url.unwrap_or_else(|| endpoints::CATEGORIES_VIEW.to_owned());
            (StatusCode::SEE_OTHER, HxRedirect(redirect_url), jar).into_response()
        }
        Err(error) => {
            tracing::error!("could not set auth cookie for user {}: {error}", user.id);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}



#[cfg(test)]
mod post_log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::{TestResponse, TestServer};
    use time::{Duration, OffsetDateTime};

    use crate::{
        app_state::create_cookie_key,
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION},
        endpoints,
        test_utils::{get_test_connection, insert_test_user_with_password},
    };

    use super::{LoginState, REMEMBER_ME_COOKIE_DURATION, post_log_in};

    const EMAIL: &str = "ada@example.com";
    const PASSWORD: &str = "correct horse";

    fn get_server() -> TestServer {
        let connection = get_test_connection();
        insert_test_user_with_password(EMAIL, PASSWORD, &connection);
        let state = LoginState {
            cookie_key: create_cookie_key("pennywise test secret"),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    async fn log_in(server: &TestServer, form: &[(&str, &str)]) -> TestResponse {
        server.post(endpoints::LOG_IN_API).form(form).await
    }

    #[track_caller]
    fn assert_session_lasts(response: &TestResponse, duration: Duration) {
        let expires = response
            .cookie(COOKIE_TOKEN)
            .expires_datetime()
            .expect("auth cookie has no expiry");
        let want = OffsetDateTime::now_utc() + duration;

        assert!(
            (expires - want).abs() < Duration::seconds(2),
            "got expiry {expires:?}, want {want:?}"
        );
    }

    #[tokio::test]
    async fn valid_credentials_set_cookie_and_redirect_to_categories() {
        let server = get_server();

        let response = log_in(&server, &[("email", EMAIL), ("password", PASSWORD)]).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::CATEGORIES_VIEW);
        assert_session_lasts(&response, DEFAULT_COOKIE_DURATION);
    }

    #[tokio::test]
    async fn remember_me_keeps_session_for_a_week() {
        let server = get_server();

        let response = log_in(
            &server,
            &[("email", EMAIL), ("password", PASSWORD), ("remember_me", "on")],
        )
        .await;

        assert_session_lasts(&response, REMEMBER_ME_COOKIE_DURATION);
    }

    #[tokio::test]
    async fn redirects_to_requested_local_page_only() {
        let server = get_server();

        let local = log_in(
            &server,
            &[("email", EMAIL), ("password", PASSWORD), ("redirect_url", "/settings")],
        )
        .await;
        let off_site = log_in(
            &server,
            &[
                ("email", EMAIL),
                ("password", PASSWORD),
                ("redirect_url", "https://example.com"),
            ],
        )
        .await;

        assert_eq!(local.header("hx-redirect"), "/settings");
        assert_eq!(off_site.header("hx-redirect"), endpoints::CATEGORIES_VIEW);
    }

    #[tokio::test]
    async fn wrong_password_returns_form_with_error_and_no_cookie() {
        let server = get_server();

        let response = log_in(&server, &[("email", EMAIL), ("password", "nope")]).await;

        response.assert_status_ok();
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
        let text = response.text();
        assert!(text.contains("Incorrect email or password."), "got {text}");
        assert!(text.contains(EMAIL), "the email should be kept in the form");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let server = get_server();

        server
            .post(endpoints::LOG_IN_API)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
