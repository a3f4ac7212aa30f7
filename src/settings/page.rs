//! The settings page and the endpoint for saving settings.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    endpoints,
    html::{
        FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        checkbox_input, submit_button,
    },
    navigation::NavBar,
    notice::{Notice, refresh_response},
    settings::{
        db::{get_or_create_user_settings, save_user_settings},
        domain::{
            AUTO_TIMEZONE, Choice, DateFormat, DateTimeFormat, Language, NumberFormat, StartPage,
            TimezoneSetting, UserSettings, parse_choice,
        },
    },
    timezone::timezone_names,
};

/// The state needed for the settings page and endpoint.
#[derive(Debug, Clone)]
pub struct SettingsState {
    /// The database connection for managing settings.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw values submitted with the settings form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFormData {
    /// Checkboxes are only submitted when checked.
    pub hide_amounts: Option<String>,
    pub mute_sounds: Option<String>,
    pub date_format: String,
    pub datetime_format: String,
    pub number_format: String,
    pub language: String,
    pub timezone: String,
    pub start_page: String,
}

impl From<&UserSettings> for SettingsFormData {
    fn from(settings: &UserSettings) -> Self {
        Self {
            hide_amounts: settings.hide_amounts.then(|| "on".to_owned()),
            mute_sounds: settings.mute_sounds.then(|| "on".to_owned()),
            date_format: settings.date_format.value().to_owned(),
            datetime_format: settings.datetime_format.value().to_owned(),
            number_format: settings.number_format.value().to_owned(),
            language: settings.language.value().to_owned(),
            timezone: settings.timezone.as_str().to_owned(),
            start_page: settings.start_page.value().to_owned(),
        }
    }
}

/// Error messages for the fields of the settings form.
#[derive(Debug, Default, PartialEq)]
pub struct SettingsFormErrors {
    pub date_format: Option<String>,
    pub datetime_format: Option<String>,
    pub number_format: Option<String>,
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub start_page: Option<String>,
}

fn choice_error<T>(result: &Result<T, Error>) -> Option<String> {
    result.as_ref().err().map(|_| "Select a valid choice".to_owned())
}

impl SettingsFormData {
    /// Parse the submitted values into settings for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error message for every field whose value is not one of its choices.
    pub fn validate(&self, user_id: UserID) -> Result<UserSettings, SettingsFormErrors> {
        let date_format = parse_choice::<DateFormat>("date_format", &self.date_format);
        let datetime_format =
            parse_choice::<DateTimeFormat>("datetime_format", &self.datetime_format);
        let number_format = parse_choice::<NumberFormat>("number_format", &self.number_format);
        let language = parse_choice::<Language>("language", &self.language);
        let timezone = TimezoneSetting::parse(&self.timezone);
        let start_page = parse_choice::<StartPage>("start_page", &self.start_page);

        match (
            date_format,
            datetime_format,
            number_format,
            language,
            timezone,
            start_page,
        ) {
            (
                Ok(date_format),
                Ok(datetime_format),
                Ok(number_format),
                Ok(language),
                Ok(timezone),
                Ok(start_page),
            ) => Ok(UserSettings {
                user_id,
                hide_amounts: self.hide_amounts.is_some(),
                mute_sounds: self.mute_sounds.is_some(),
                date_format,
                datetime_format,
                number_format,
                language,
                timezone,
                start_page,
            }),
            (date_format, datetime_format, number_format, language, timezone, start_page) => {
                Err(SettingsFormErrors {
                    date_format: choice_error(&date_format),
                    datetime_format: choice_error(&datetime_format),
                    number_format: choice_error(&number_format),
                    language: choice_error(&language),
                    timezone: choice_error(&timezone),
                    start_page: choice_error(&start_page),
                })
            }
        }
    }
}

/// The value and label of every choice of `T`.
fn choices<T: Choice>() -> impl Iterator<Item = (&'static str, &'static str)> {
    T::ALL.iter().map(|choice| (choice.value(), choice.label()))
}

/// "Auto" followed by every known timezone.
fn timezone_choices() -> impl Iterator<Item = (&'static str, &'static str)> {
    std::iter::once((AUTO_TIMEZONE, "Auto"))
        .chain(timezone_names().into_iter().map(|name| (name, name)))
}

fn select_input(
    name: &str,
    label: &str,
    options: impl Iterator<Item = (&'static str, &'static str)>,
    selected_value: &str,
    error_message: Option<&str>,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) class=(FORM_TEXT_INPUT_STYLE) required
            {
                @for (value, option_label) in options {
                    option value=(value) selected[value == selected_value]
                    {
                        (option_label)
                    }
                }
            }

            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

fn settings_form_view(form: &SettingsFormData, errors: &SettingsFormErrors) -> Markup {
    html! {
        form
            hx-put=(endpoints::PUT_SETTINGS)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            (checkbox_input("hide_amounts", "Hide amounts", form.hide_amounts.is_some()))
            (checkbox_input("mute_sounds", "Mute sounds", form.mute_sounds.is_some()))

            (select_input(
                "date_format",
                "Date Format",
                choices::<DateFormat>(),
                &form.date_format,
                errors.date_format.as_deref()
            ))
            (select_input(
                "datetime_format",
                "Datetime Format",
                choices::<DateTimeFormat>(),
                &form.datetime_format,
                errors.datetime_format.as_deref()
            ))
            (select_input(
                "number_format",
                "Number Format",
                choices::<NumberFormat>(),
                &form.number_format,
                errors.number_format.as_deref()
            ))
            (select_input(
                "language", "Language", choices::<Language>(), &form.language, errors.language.as_deref()
            ))
            (select_input(
                "timezone", "Time Zone", timezone_choices(), &form.timezone, errors.timezone.as_deref()
            ))
            (select_input(
                "start_page",
                "Start page",
                choices::<StartPage>(),
                &form.start_page,
                errors.start_page.as_deref()
            ))

            (submit_button("Save"))
        }
    }
}

fn settings_page_view(email: &str, form: &SettingsFormData) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-2" { "Settings" }
            p class="text-sm text-gray-500 dark:text-gray-400 mb-4" { (email) }

            (settings_form_view(form, &SettingsFormErrors::default()))
        }
    };

    base("Settings", &content)
}

/// Render the settings page for the logged in user, creating their settings if missing.
pub async fn get_settings_page(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user = match get_user_by_id(user_id, &connection) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    match get_or_create_user_settings(user_id, &connection) {
        Ok(settings) => {
            settings_page_view(user.email.as_str(), &SettingsFormData::from(&settings))
                .into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// Validate and save the settings form.
///
/// The form is sent back with errors if any field is invalid.
pub async fn update_settings(
    State(state): State<SettingsState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<SettingsFormData>,
) -> Response {
    let settings = match form.validate(user_id) {
        Ok(settings) => settings,
        Err(errors) => return settings_form_view(&form, &errors).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match save_user_settings(&settings, &connection) {
        Ok(()) => refresh_response(Some(Notice::success("Settings saved successfully"))),
        Err(error) => {
            tracing::error!("could not save settings for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod settings_form_tests {
    use crate::{
        auth::UserID,
        settings::domain::{DateFormat, Language, TimezoneSetting, UserSettings},
    };

    use super::SettingsFormData;

    fn valid_form() -> SettingsFormData {
        SettingsFormData::from(&UserSettings::default_for(UserID::new(1)))
    }

    #[test]
    fn default_settings_round_trip_through_form() {
        let form = valid_form();

        assert_eq!(
            form.validate(UserID::new(1)),
            Ok(UserSettings::default_for(UserID::new(1)))
        );
    }

    #[test]
    fn checkboxes_and_choices_are_parsed() {
        let form = SettingsFormData {
            hide_amounts: Some("on".to_owned()),
            date_format: "d.m.Y".to_owned(),
            language: "de".to_owned(),
            timezone: "Europe/Berlin".to_owned(),
            ..valid_form()
        };

        let settings = form.validate(UserID::new(1)).unwrap();

        assert!(settings.hide_amounts);
        assert!(!settings.mute_sounds);
        assert_eq!(settings.date_format, DateFormat::DayMonthYearDotted);
        assert_eq!(settings.language, Language::German);
        assert_eq!(
            settings.timezone,
            TimezoneSetting::Named("Europe/Berlin".to_owned())
        );
    }

    #[test]
    fn invalid_choices_are_reported_per_field() {
        let form = SettingsFormData {
            number_format: "XX".to_owned(),
            timezone: "Mars/Olympus_Mons".to_owned(),
            ..valid_form()
        };

        let errors = form.validate(UserID::new(1)).unwrap_err();

        assert!(errors.number_format.is_some());
        assert!(errors.timezone.is_some());
        assert!(errors.date_format.is_none());
        assert!(errors.language.is_none());
        assert!(errors.start_page.is_none());
    }
}
