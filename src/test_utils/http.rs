use axum::{body::Body, response::Response};
use serde_json::Value;

use crate::notice::NoticeLevel;

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}

/// Get the event names in the HX-Trigger header.
///
/// The header is either a comma separated list of event names or, when any
/// event carries data, a JSON object keyed by event name.
fn get_trigger_event_names(response: &Response<Body>) -> Vec<String> {
    let header = get_header(response, "hx-trigger");

    match serde_json::from_str::<Value>(&header) {
        Ok(Value::Object(events)) => events.keys().cloned().collect(),
        _ => header
            .split(',')
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect(),
    }
}

#[track_caller]
pub(crate) fn assert_trigger_events(response: &Response<Body>, want_events: &[&str]) {
    let mut got_events = get_trigger_event_names(response);
    got_events.sort();
    let mut want_events = want_events
        .iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    want_events.sort();

    assert_eq!(want_events, got_events);
}

#[track_caller]
pub(crate) fn assert_toast(response: &Response<Body>, level: NoticeLevel, message: &str) {
    let header = get_header(response, "hx-trigger");
    let events: Value = serde_json::from_str(&header)
        .unwrap_or_else(|error| panic!("HX-Trigger {header:?} is not JSON: {error}"));
    let toast = events.get("toast").expect("No toast event found");
    let want_level = serde_json::to_value(level).unwrap();

    assert_eq!(toast["level"], want_level, "got toast {toast}");
    assert_eq!(toast["message"], message, "got toast {toast}");
}

#[track_caller]
pub(crate) fn assert_no_toast(response: &Response<Body>) {
    let events = get_trigger_event_names(response);

    assert!(
        !events.iter().any(|name| name == "toast"),
        "want no toast event, got {events:?}"
    );
}
