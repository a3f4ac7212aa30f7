//! Database initialization.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, auth::create_user_table, category::create_category_tables,
    settings::create_user_settings_table,
};

/// Enable foreign keys and create the tables for the domain models if they do not exist.
///
/// The tables are created in a single transaction, so either all of the
/// tables are created or none of them are.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Foreign keys cannot be toggled inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_user_settings_table(&transaction)?;
    create_category_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}
