//! Database operations for categories and who they are shared with.

use std::collections::HashMap;

use rusqlite::{Connection, Row, named_params};

use crate::{
    Error,
    auth::UserID,
    category::domain::{Category, CategoryFields, CategoryId, CategoryName},
    shared_object::{Sharing, Visibility},
};

/// Create the category table and the table of users each category is shared with.
pub fn create_category_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            mute INTEGER NOT NULL DEFAULT 0,
            active INTEGER NOT NULL DEFAULT 1,
            owner_id INTEGER,
            visibility TEXT NOT NULL DEFAULT 'private',
            UNIQUE(owner_id, name),
            FOREIGN KEY(owner_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE TABLE IF NOT EXISTS category_shared_with (
            category_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            PRIMARY KEY(category_id, user_id),
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_active ON category(active);
        CREATE INDEX IF NOT EXISTS idx_category_shared_with_user
            ON category_shared_with(user_id);",
    )?;

    Ok(())
}

/// Filter for the categories a user can see: the ones they own, unowned
/// categories, public categories and the ones shared with them.
///
/// Expects the `:user_id` parameter.
const VISIBLE_TO_USER: &str = "(
    owner_id IS NULL
    OR owner_id = :user_id
    OR visibility = 'public'
    OR id IN (SELECT category_id FROM category_shared_with WHERE user_id = :user_id)
)";

/// Create a category owned by `owner` that only the owner can see.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if `owner` already has a category with this name.
pub fn create_category(
    fields: CategoryFields,
    owner: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let sharing = Sharing::private(owner);

    connection.execute(
        "INSERT INTO category (name, mute, active, owner_id, visibility)
        VALUES (?1, ?2, ?3, ?4, ?5);",
        (
            fields.name.as_ref(),
            fields.mute,
            fields.active,
            owner.as_i64(),
            sharing.visibility,
        ),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        name: fields.name,
        mute: fields.mute,
        active: fields.active,
        sharing,
    })
}

/// Retrieve a single category by ID, regardless of who can see it.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    let mut category = connection
        .prepare(
            "SELECT id, name, mute, active, owner_id, visibility FROM category WHERE id = :id;",
        )?
        .query_row(named_params! {":id": category_id}, map_row)?;

    category.sharing.shared_with = get_shared_with(category_id, connection)?;

    Ok(category)
}

/// Retrieve a single category by ID if `user` can see it.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist or is hidden from `user`.
pub fn get_visible_category(
    category_id: CategoryId,
    user: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let mut category = connection
        .prepare(&format!(
            "SELECT id, name, mute, active, owner_id, visibility FROM category
            WHERE id = :id AND {VISIBLE_TO_USER};"
        ))?
        .query_row(
            named_params! {":id": category_id, ":user_id": user.as_i64()},
            map_row,
        )?;

    category.sharing.shared_with = get_shared_with(category_id, connection)?;

    Ok(category)
}

/// Retrieve the categories visible to `user` with the given `active` state, ordered by ID.
pub fn get_visible_categories(
    user: UserID,
    active: bool,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    let user_id = user.as_i64();
    let params = named_params! {":active": active, ":user_id": user_id};

    let mut categories = connection
        .prepare(&format!(
            "SELECT id, name, mute, active, owner_id, visibility FROM category
            WHERE active = :active AND {VISIBLE_TO_USER}
            ORDER BY id ASC;"
        ))?
        .query_map(params, map_row)?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    let mut recipients: HashMap<CategoryId, Vec<UserID>> = HashMap::new();
    let mut statement = connection.prepare(&format!(
        "SELECT category_id, user_id FROM category_shared_with
        WHERE category_id IN (
            SELECT id FROM category WHERE active = :active AND {VISIBLE_TO_USER}
        )
        ORDER BY category_id ASC, user_id ASC;"
    ))?;
    let rows = statement.query_map(params, |row| {
        Ok((row.get::<_, CategoryId>(0)?, UserID::new(row.get(1)?)))
    })?;

    for row in rows {
        let (category_id, user) = row?;
        recipients.entry(category_id).or_default().push(user);
    }

    for category in &mut categories {
        if let Some(shared_with) = recipients.remove(&category.id) {
            category.sharing.shared_with = shared_with;
        }
    }

    Ok(categories)
}

/// Update the name, mute and active fields of a category.
///
/// # Errors
///
/// Returns [Error::UpdateMissingCategory] if the category does not exist or
/// [Error::DuplicateCategoryName] if another category with the same owner has the new name.
pub fn update_category(
    category_id: CategoryId,
    fields: &CategoryFields,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, mute = ?2, active = ?3 WHERE id = ?4",
        (fields.name.as_ref(), fields.mute, fields.active, category_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category, which also stops it being shared with anyone.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Stop sharing a category with `user`. The category itself is kept.
pub fn remove_shared_with(
    category_id: CategoryId,
    user: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "DELETE FROM category_shared_with WHERE category_id = ?1 AND user_id = ?2",
        (category_id, user.as_i64()),
    )?;

    Ok(())
}

/// Replace the owner, visibility and recipients of a category.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if the new owner already has a category with this name.
pub fn save_sharing(
    category_id: CategoryId,
    sharing: &Sharing,
    connection: &Connection,
) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    let rows_affected = transaction.execute(
        "UPDATE category SET owner_id = ?1, visibility = ?2 WHERE id = ?3",
        (
            sharing.owner.map(|owner| owner.as_i64()),
            sharing.visibility,
            category_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    transaction.execute(
        "DELETE FROM category_shared_with WHERE category_id = ?1",
        [category_id],
    )?;

    {
        let mut statement = transaction.prepare(
            "INSERT INTO category_shared_with (category_id, user_id) VALUES (?1, ?2)",
        )?;

        for user in &sharing.shared_with {
            statement.execute((category_id, user.as_i64()))?;
        }
    }

    transaction.commit()?;

    Ok(())
}

/// Make `user` the owner of a category if it has no owner, and make it private.
///
/// Returns whether ownership was taken. Categories that already have an owner are left unchanged.
///
/// # Errors
///
/// Returns [Error::DuplicateCategoryName] if `user` already has a category with this name.
pub fn take_ownership(
    category_id: CategoryId,
    user: UserID,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET owner_id = ?1, visibility = ?2 WHERE id = ?3 AND owner_id IS NULL",
        (user.as_i64(), Visibility::Private, category_id),
    )?;

    Ok(rows_affected == 1)
}

fn get_shared_with(
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Vec<UserID>, rusqlite::Error> {
    connection
        .prepare(
            "SELECT user_id FROM category_shared_with WHERE category_id = ?1 ORDER BY user_id ASC",
        )?
        .query_map([category_id], |row| row.get(0).map(UserID::new))?
        .collect()
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;
    let owner: Option<i64> = row.get(4)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        mute: row.get(2)?,
        active: row.get(3)?,
        sharing: Sharing {
            owner: owner.map(UserID::new),
            visibility: row.get(5)?,
            shared_with: Vec::new(),
        },
    })
}
