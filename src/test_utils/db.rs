use rusqlite::Connection;

use crate::{
    PasswordHash, User, ValidatedPassword,
    auth::{NewUser, create_user},
    db::initialize,
};

/// Open an in-memory database with all of the application's tables.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");

    connection
}

/// Insert a user with `email` and a placeholder password hash.
pub(crate) fn insert_test_user(email: &str, connection: &Connection) -> User {
    create_user(
        NewUser {
            email: email.parse().expect("Invalid test email"),
            password_hash: PasswordHash::new_unchecked("hunter2"),
            first_name: String::new(),
            last_name: String::new(),
        },
        connection,
    )
    .expect("Could not create test user")
}

/// Insert a user who can log in with `password`.
///
/// The hash uses the lowest bcrypt cost to keep tests fast.
pub(crate) fn insert_test_user_with_password(
    email: &str,
    password: &str,
    connection: &Connection,
) -> User {
    create_user(
        NewUser {
            email: email.parse().expect("Invalid test email"),
            password_hash: PasswordHash::new(ValidatedPassword::new_unchecked(password), 4)
                .expect("Could not hash test password"),
            first_name: String::new(),
            last_name: String::new(),
        },
        connection,
    )
    .expect("Could not create test user")
}
