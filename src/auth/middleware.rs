//! Middleware that only lets requests with a valid auth cookie through.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::UtcOffset;

use crate::{
    AppState,
    auth::{
        DEFAULT_COOKIE_DURATION, UserID,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::{build_log_in_redirect_url, build_log_in_redirect_url_from_target},
    },
    endpoints,
    timezone::get_local_offset,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

// Lets `PrivateCookieJar` find the key in the middleware state.
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// How an unauthenticated request is sent to the log-in page.
#[derive(Debug, Clone, Copy)]
enum LogInRedirect {
    /// A `303 See Other` with a `Location` header, for full page loads.
    Page,
    /// A `200 OK` with an `HX-Redirect` header, so HTMX loads the log-in page
    /// instead of swapping it into the current page.
    Htmx,
}

impl LogInRedirect {
    fn to(self, url: &str) -> Response {
        match self {
            Self::Page => Redirect::to(url).into_response(),
            Self::Htmx => (HxRedirect(url.to_owned()), StatusCode::OK).into_response(),
        }
    }
}

/// The log-in URL that brings the user back to where the request came from.
fn log_in_url_for(request: &Request) -> String {
    build_log_in_redirect_url(request).unwrap_or_else(|| {
        tracing::warn!("Could not build redirect URL from request. Falling back to categories.");

        build_log_in_redirect_url_from_target(endpoints::CATEGORIES_VIEW)
            .unwrap_or_else(|| endpoints::LOG_IN_VIEW.to_owned())
    })
}

/// The user the auth cookie belongs to, along with the jar the cookie came from.
///
/// Returns `None` if the cookie is missing, cannot be decrypted or has expired.
async fn authenticate(
    parts: &mut Parts,
    state: &AuthState,
) -> Option<(UserID, PrivateCookieJar)> {
    let jar = match PrivateCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}");
            return None;
        }
    };

    match get_token_from_cookies(&jar) {
        Ok(token) => Some((token.user_id, jar)),
        Err(error) => {
            tracing::debug!("Rejected auth cookie: {error}");
            None
        }
    }
}

/// Copy the `Set-Cookie` headers for the extended session into `headers`.
///
/// The jar is left as it was if the new expiry cannot be computed.
fn append_extended_session(
    headers: &mut HeaderMap,
    jar: PrivateCookieJar,
    local_offset: UtcOffset,
) {
    let jar = match extend_auth_cookie_duration_if_needed(
        jar.clone(),
        DEFAULT_COOKIE_DURATION,
        local_offset,
    ) {
        Ok(extended_jar) => extended_jar,
        Err(error) => {
            tracing::error!("Error extending cookie duration: {error:?}. Keeping the old cookie.");
            jar
        }
    };

    let jar_response = jar.into_response();
    for value in jar_response.headers().get_all(SET_COOKIE) {
        headers.append(SET_COOKIE, value.clone());
    }
}

async fn guard(
    state: AuthState,
    request: Request,
    next: Next,
    log_in_redirect: LogInRedirect,
) -> Response {
    let log_in_url = log_in_url_for(&request);

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!(
            "Could not get the offset for timezone \"{}\". Redirecting to log in page.",
            state.local_timezone
        );
        return log_in_redirect.to(&log_in_url);
    };

    let (mut parts, body) = request.into_parts();
    let Some((user_id, jar)) = authenticate(&mut parts, &state).await else {
        return log_in_redirect.to(&log_in_url);
    };

    parts.extensions.insert(user_id);
    let response = next.run(Request::from_parts(parts, body)).await;

    let (mut parts, body) = response.into_parts();
    append_extended_session(&mut parts.headers, jar, local_offset);

    Response::from_parts(parts, body)
}

/// Let requests with a valid auth cookie through and redirect everything else
/// to the log-in page.
///
/// The user's [UserID] is added to the request extensions, so handlers can
/// take `Extension(user_id): Extension<UserID>`. The session is extended on
/// the way out.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    guard(state, request, next, LogInRedirect::Page).await
}

/// Like [auth_guard], but redirects with the `HX-Redirect` header for routes
/// that are requested by HTMX.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    guard(state, request, next, LogInRedirect::Htmx).await
}
