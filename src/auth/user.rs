//! Code for creating the user table and fetching users from the database.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, PasswordHash, settings::create_default_user_settings};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user of the application.
///
/// Users log in with their email address, which is unique.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email address the user logs in with.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The user's given name, may be empty.
    pub first_name: String,
    /// The user's family name, may be empty.
    pub last_name: String,
    /// Whether the user may log in.
    pub is_active: bool,
    /// When the user registered, in UTC.
    pub date_joined: OffsetDateTime,
}

impl Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.email.fmt(f)
    }
}

/// The data needed to register a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub first_name: String,
    pub last_name: String,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                first_name TEXT NOT NULL DEFAULT '',
                last_name TEXT NOT NULL DEFAULT '',
                is_active INTEGER NOT NULL DEFAULT 1,
                date_joined TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database along with their default settings.
///
/// The user and their settings are inserted in one transaction.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if the email is already used by another user,
/// - [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let transaction = connection.unchecked_transaction()?;
    let date_joined = OffsetDateTime::now_utc();

    transaction.execute(
        "INSERT INTO user (email, password, first_name, last_name, is_active, date_joined)
        VALUES (?1, ?2, ?3, ?4, 1, ?5)",
        (
            new_user.email.as_str(),
            new_user.password_hash.to_string(),
            &new_user.first_name,
            &new_user.last_name,
            date_joined,
        ),
    )?;

    let id = UserID::new(transaction.last_insert_rowid());
    create_default_user_settings(id, &transaction)?;

    transaction.commit()?;

    Ok(User {
        id,
        email: new_user.email,
        password_hash: new_user.password_hash,
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        is_active: true,
        date_joined,
    })
}

const SELECT_USER: &str =
    "SELECT id, email, password, first_name, last_name, is_active, date_joined FROM user";

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: EmailAddress::new_unchecked(raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        is_active: row.get(5)?,
        date_joined: row.get(6)?,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user is registered with `email`.
pub fn get_user_by_email(email: &EmailAddress, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("{SELECT_USER} WHERE email = :email"))?
        .query_row(&[(":email", email.as_str())], map_user_row)
        .map_err(|error| error.into())
}

/// Get all registered users ordered by email.
pub fn get_all_users(connection: &Connection) -> Result<Vec<User>, Error> {
    connection
        .prepare(&format!("{SELECT_USER} ORDER BY email"))?
        .query_map([], map_user_row)?
        .map(|maybe_user| maybe_user.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod user_tests {
    use email_address::EmailAddress;

    use crate::{
        Error, PasswordHash,
        settings::get_user_settings,
        test_utils::{get_test_connection, insert_test_user},
    };

    use super::{NewUser, UserID, create_user, get_all_users, get_user_by_email, get_user_by_id};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.parse().unwrap(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
        }
    }

    #[test]
    fn insert_user_succeeds() {
        let connection = get_test_connection();

        let inserted_user = create_user(new_user("ada@example.com"), &connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email.as_str(), "ada@example.com");
        assert_eq!(inserted_user.password_hash, PasswordHash::new_unchecked("hunter2"));
        assert!(inserted_user.is_active);
    }

    #[test]
    fn insert_user_creates_default_settings() {
        let connection = get_test_connection();

        let user = create_user(new_user("ada@example.com"), &connection).unwrap();

        let settings = get_user_settings(user.id, &connection);
        assert!(settings.is_ok(), "want default settings, got {settings:?}");
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let connection = get_test_connection();
        create_user(new_user("ada@example.com"), &connection).unwrap();

        let result = create_user(new_user("ada@example.com"), &connection);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn duplicate_email_does_not_leave_orphaned_settings() {
        let connection = get_test_connection();
        create_user(new_user("ada@example.com"), &connection).unwrap();

        let _ = create_user(new_user("ada@example.com"), &connection);

        let settings_count: i64 = connection
            .query_row("SELECT COUNT(*) FROM user_settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(settings_count, 1);
    }

    #[test]
    fn get_user_by_id_succeeds() {
        let connection = get_test_connection();
        let inserted_user = insert_test_user("ada@example.com", &connection);

        let selected_user = get_user_by_id(inserted_user.id, &connection).unwrap();

        assert_eq!(selected_user.id, inserted_user.id);
        assert_eq!(selected_user.email, inserted_user.email);
        assert_eq!(selected_user.password_hash, inserted_user.password_hash);
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let connection = get_test_connection();

        assert_eq!(
            get_user_by_id(UserID::new(42), &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_user_by_email_succeeds() {
        let connection = get_test_connection();
        let inserted_user = insert_test_user("ada@example.com", &connection);

        let selected_user =
            get_user_by_email(&"ada@example.com".parse().unwrap(), &connection).unwrap();

        assert_eq!(selected_user.id, inserted_user.id);
    }

    #[test]
    fn get_user_by_email_fails_with_unknown_email() {
        let connection = get_test_connection();
        let email: EmailAddress = "nobody@example.com".parse().unwrap();

        assert_eq!(get_user_by_email(&email, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_users_orders_by_email() {
        let connection = get_test_connection();
        insert_test_user("zed@example.com", &connection);
        insert_test_user("ada@example.com", &connection);

        let emails = get_all_users(&connection)
            .unwrap()
            .into_iter()
            .map(|user| user.email.to_string())
            .collect::<Vec<_>>();

        assert_eq!(emails, vec!["ada@example.com", "zed@example.com"]);
    }

    #[test]
    fn user_displays_as_email() {
        let connection = get_test_connection();
        let user = insert_test_user("ada@example.com", &connection);

        assert_eq!(user.to_string(), "ada@example.com");
    }
}
