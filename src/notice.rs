//! User-facing notices sent alongside empty responses.
//!
//! Mutating endpoints respond with 204 No Content, so there is no body to put
//! an alert in. Instead, the response carries an `HX-Trigger` header that
//! tells the client to refresh its views (`updated`), close the off-canvas
//! panel (`hide_offcanvas`) and show a toast with the notice (`toast`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxEvent, HxResponseTrigger};
use serde::Serialize;

/// Event that tells the client to re-fetch the fragments showing updated data.
pub const UPDATED_EVENT: &str = "updated";
/// Event that tells the client to close any open off-canvas panel.
pub const HIDE_OFFCANVAS_EVENT: &str = "hide_offcanvas";
/// Event that tells the client to show a toast with a notice.
pub const TOAST_EVENT: &str = "toast";

/// How a notice should be styled on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the user about the outcome of their request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.to_owned(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.to_owned(),
        }
    }
}

/// Build the 204 response that refreshes the client's views, closes the
/// off-canvas panel and, if given, shows `notice`.
pub fn refresh_response(notice: Option<Notice>) -> Response {
    let mut events = vec![
        HxEvent::new(UPDATED_EVENT),
        HxEvent::new(HIDE_OFFCANVAS_EVENT),
    ];

    if let Some(notice) = notice {
        match HxEvent::new_with_data(TOAST_EVENT, &notice) {
            Ok(event) => events.push(event),
            Err(error) => {
                tracing::error!("Could not serialize notice {notice:?}: {error}");
            }
        }
    }

    (StatusCode::NO_CONTENT, HxResponseTrigger::normal(events), ()).into_response()
}
