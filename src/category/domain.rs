//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    shared_object::{SharedObject, Sharing},
};

/// Database identifier for a category.
pub type CategoryId = DatabaseId;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A category for grouping transactions, e.g. 'Groceries'.
///
/// Archived categories have `active` set to false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    /// Whether transactions in this category are left out of notifications.
    pub mute: bool,
    pub active: bool,
    pub sharing: Sharing,
}

impl SharedObject for Category {
    fn sharing(&self) -> &Sharing {
        &self.sharing
    }
}

/// The fields of a category that can be set with the category form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: CategoryName,
    pub mute: bool,
    pub active: bool,
}

/// Form data for category creation and editing.
///
/// Checkboxes are only submitted when they are checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    pub mute: Option<String>,
    pub active: Option<String>,
}

impl CategoryFormData {
    /// The form for a new category, which starts out active.
    pub fn new_category() -> Self {
        Self {
            name: String::new(),
            mute: None,
            active: Some("on".to_owned()),
        }
    }

    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.to_string(),
            mute: category.mute.then(|| "on".to_owned()),
            active: category.active.then(|| "on".to_owned()),
        }
    }

    /// Parse the submitted values.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategoryName] if the name is blank.
    pub fn validate(&self) -> Result<CategoryFields, Error> {
        Ok(CategoryFields {
            name: CategoryName::new(&self.name)?,
            mute: self.mute.is_some(),
            active: self.active.is_some(),
        })
    }
}


#[cfg(test)]
mod category_form_tests {
    use crate::{
        Error,
        category::domain::{CategoryFields, CategoryFormData, CategoryName},
    };

    #[test]
    fn missing_checkboxes_are_false() {
        let form = CategoryFormData {
            name: "Rent".to_owned(),
            mute: None,
            active: None,
        };

        assert_eq!(
            form.validate(),
            Ok(CategoryFields {
                name: CategoryName::new_unchecked("Rent"),
                mute: false,
                active: false,
            })
        );
    }

    #[test]
    fn checked_checkboxes_are_true() {
        let form = CategoryFormData {
            name: "Rent".to_owned(),
            mute: Some("on".to_owned()),
            active: Some("on".to_owned()),
        };

        let fields = form.validate().unwrap();

        assert!(fields.mute);
        assert!(fields.active);
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = CategoryFormData {
            name: "   ".to_owned(),
            ..CategoryFormData::new_category()
        };

        assert_eq!(form.validate(), Err(Error::EmptyCategoryName));
    }
}
