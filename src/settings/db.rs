//! Storing user settings in the database.

use rusqlite::{Connection, Row, types::Type};

use crate::{
    Error,
    auth::UserID,
    settings::domain::{Choice, TimezoneSetting, UserSettings, parse_choice},
};

/// Create the user settings table.
///
/// Settings are deleted along with their user.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_user_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user_settings (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL UNIQUE,
                hide_amounts INTEGER NOT NULL DEFAULT 0,
                mute_sounds INTEGER NOT NULL DEFAULT 0,
                date_format TEXT NOT NULL DEFAULT 'SHORT_DATE_FORMAT',
                datetime_format TEXT NOT NULL DEFAULT 'SHORT_DATETIME_FORMAT',
                number_format TEXT NOT NULL DEFAULT 'AA',
                language TEXT NOT NULL DEFAULT 'auto',
                timezone TEXT NOT NULL DEFAULT 'auto',
                start_page TEXT NOT NULL DEFAULT 'MONTHLY_OVERVIEW',
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Insert the default settings for `user_id`.
///
/// # Errors
/// Returns an error if the user already has settings or there is an SQL error.
pub fn create_default_user_settings(
    user_id: UserID,
    connection: &Connection,
) -> Result<UserSettings, Error> {
    let settings = UserSettings::default_for(user_id);

    connection.execute(
        "INSERT INTO user_settings
            (user_id, hide_amounts, mute_sounds, date_format, datetime_format, number_format,
            language, timezone, start_page)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            user_id.as_i64(),
            settings.hide_amounts,
            settings.mute_sounds,
            settings.date_format.value(),
            settings.datetime_format.value(),
            settings.number_format.value(),
            settings.language.value(),
            settings.timezone.as_str(),
            settings.start_page.value(),
        ),
    )?;

    Ok(settings)
}

fn parse_column<T: Choice>(row: &Row, index: usize, field: &'static str) -> Result<T, rusqlite::Error> {
    let raw_value: String = row.get(index)?;

    parse_choice(field, &raw_value)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

fn map_row(row: &Row) -> Result<UserSettings, rusqlite::Error> {
    let raw_timezone: String = row.get(7)?;
    let timezone = TimezoneSetting::parse(&raw_timezone)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(error)))?;

    Ok(UserSettings {
        user_id: UserID::new(row.get(0)?),
        hide_amounts: row.get(1)?,
        mute_sounds: row.get(2)?,
        date_format: parse_column(row, 3, "date_format")?,
        datetime_format: parse_column(row, 4, "datetime_format")?,
        number_format: parse_column(row, 5, "number_format")?,
        language: parse_column(row, 6, "language")?,
        timezone,
        start_page: parse_column(row, 8, "start_page")?,
    })
}

/// Get the settings of `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if the user has no settings.
pub fn get_user_settings(user_id: UserID, connection: &Connection) -> Result<UserSettings, Error> {
    connection
        .prepare(
            "SELECT user_id, hide_amounts, mute_sounds, date_format, datetime_format,
                number_format, language, timezone, start_page
            FROM user_settings WHERE user_id = :user_id",
        )?
        .query_row(&[(":user_id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the settings of `user_id`, creating the default settings if the user has none.
pub fn get_or_create_user_settings(
    user_id: UserID,
    connection: &Connection,
) -> Result<UserSettings, Error> {
    match get_user_settings(user_id, connection) {
        Err(Error::NotFound) => create_default_user_settings(user_id, connection),
        result => result,
    }
}

/// Save `settings`, creating the row if the user has no settings yet.
///
/// # Errors
/// Returns an error if `settings.user_id` is not a registered user or there is an SQL error.
pub fn save_user_settings(settings: &UserSettings, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO user_settings
            (user_id, hide_amounts, mute_sounds, date_format, datetime_format, number_format,
            language, timezone, start_page)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(user_id) DO UPDATE SET
            hide_amounts = excluded.hide_amounts,
            mute_sounds = excluded.mute_sounds,
            date_format = excluded.date_format,
            datetime_format = excluded.datetime_format,
            number_format = excluded.number_format,
            language = excluded.language,
            timezone = excluded.timezone,
            start_page = excluded.start_page",
        (
            settings.user_id.as_i64(),
            settings.hide_amounts,
            settings.mute_sounds,
            settings.date_format.value(),
            settings.datetime_format.value(),
            settings.number_format.value(),
            settings.language.value(),
            settings.timezone.as_str(),
            settings.start_page.value(),
        ),
    )?;

    Ok(())
}
