//! Alert system for displaying error messages to users.
//!
//! Alerts are HTML fragments that HTMX swaps into the alert container at the
//! bottom of every page via `hx-target-error`.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// An error alert rendered as an HTML fragment.
#[derive(Debug, Clone)]
pub enum Alert {
    /// An error alert with a message and extra details.
    Error { message: String, details: String },
    /// An error alert with only a message.
    ErrorSimple { message: String },
}

impl Alert {
    /// Render the alert as HTML.
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, details),
            Alert::ErrorSimple { message } => (message, String::new()),
        };

        html! {
            div
                role="alert"
                class="p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                    dark:bg-gray-800 dark:text-red-400"
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    span { (details) }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
