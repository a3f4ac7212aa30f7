//! Ownership and sharing for objects that several users can see.
//!
//! An object has at most one owner. Objects without an owner can be edited
//! by anyone and claimed by the first user to take ownership of them. The
//! owner decides who else can see the object with its [Visibility] and the
//! list of users it is shared with.

use std::fmt::Display;

use maud::{Markup, html};
use rusqlite::{
    Connection,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::{User, UserID, get_all_users},
    html::{FORM_CHECKBOX_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, submit_button},
};

/// Who, other than the owner, can see an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Only the owner can see the object.
    #[default]
    Private,
    /// The owner and the users the object is shared with can see the object.
    Shared,
    /// Every user can see the object.
    Public,
}

impl Visibility {
    const ALL: [Visibility; 3] = [Self::Private, Self::Shared, Self::Public];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Shared => "shared",
            Self::Public => "public",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Private => "Private",
            Self::Shared => "Shared with selected users",
            Self::Public => "Public",
        }
    }

    /// Parse the stored or submitted value of a visibility.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidChoice] if `value` is not a visibility.
    pub fn parse(value: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|visibility| visibility.as_str() == value)
            .ok_or_else(|| Error::InvalidChoice {
                field: "visibility",
                value: value.to_owned(),
            })
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Visibility {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Visibility {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Self::parse(text).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The ownership and sharing state of an object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sharing {
    /// The user who may edit and share the object, `None` if unowned.
    pub owner: Option<UserID>,
    pub visibility: Visibility,
    /// The users the object is shared with, sorted by ID.
    pub shared_with: Vec<UserID>,
}

impl Sharing {
    /// Sharing for a new object that only `owner` can see.
    pub fn private(owner: UserID) -> Self {
        Self {
            owner: Some(owner),
            visibility: Visibility::Private,
            shared_with: Vec::new(),
        }
    }

    /// Sharing for the object after the changes in `update` made by `requester`.
    ///
    /// An unowned object becomes owned by `requester`.
    pub fn with_update(&self, update: SharingUpdate, requester: UserID) -> Self {
        Self {
            owner: self.owner.or(Some(requester)),
            visibility: update.visibility,
            shared_with: update.shared_with,
        }
    }
}

/// An object that can be owned by a user and shared with other users.
pub trait SharedObject {
    fn sharing(&self) -> &Sharing;

    /// Whether `user` may edit the object and change who it is shared with.
    ///
    /// Unowned objects can be edited by anyone.
    fn can_edit(&self, user: UserID) -> bool {
        match self.sharing().owner {
            Some(owner) => owner == user,
            None => true,
        }
    }

    /// Whether the object is shared with `user` and `user` is not its owner.
    fn is_recipient(&self, user: UserID) -> bool {
        let sharing = self.sharing();

        sharing.owner != Some(user) && sharing.shared_with.contains(&user)
    }

    fn is_unowned(&self) -> bool {
        self.sharing().owner.is_none()
    }
}

/// The raw values submitted with the sharing form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareFormData {
    pub visibility: String,
    /// One entry per checked user, the field is absent when none are checked.
    #[serde(default)]
    pub shared_with: Vec<i64>,
}

impl ShareFormData {
    /// The form filled in with the current sharing of an object.
    pub fn from_sharing(sharing: &Sharing) -> Self {
        Self {
            visibility: sharing.visibility.as_str().to_owned(),
            shared_with: sharing
                .shared_with
                .iter()
                .map(|user_id| user_id.as_i64())
                .collect(),
        }
    }

    /// Check the submitted values against the users the object can be shared with.
    ///
    /// # Errors
    ///
    /// Returns an error message for each invalid field.
    pub fn validate(&self, candidates: &[User]) -> Result<SharingUpdate, ShareFormErrors> {
        let mut errors = ShareFormErrors::default();

        let visibility = Visibility::parse(&self.visibility)
            .inspect_err(|_| errors.visibility = Some("Select a valid visibility".to_owned()))
            .ok();

        let mut shared_with = Vec::with_capacity(self.shared_with.len());
        for &raw_id in &self.shared_with {
            match candidates.iter().find(|user| user.id.as_i64() == raw_id) {
                Some(user) => shared_with.push(user.id),
                None => {
                    errors.shared_with = Some("Select a valid user".to_owned());
                    break;
                }
            }
        }
        shared_with.sort();
        shared_with.dedup();

        if visibility == Some(Visibility::Shared)
            && shared_with.is_empty()
            && errors.shared_with.is_none()
        {
            errors.shared_with = Some("Select at least one user to share with".to_owned());
        }

        match visibility {
            Some(visibility) if errors == ShareFormErrors::default() => Ok(SharingUpdate {
                visibility,
                shared_with: if visibility == Visibility::Private {
                    Vec::new()
                } else {
                    shared_with
                },
            }),
            _ => Err(errors),
        }
    }
}

/// Error messages for the fields of the sharing form.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ShareFormErrors {
    pub visibility: Option<String>,
    pub shared_with: Option<String>,
}

/// The validated changes from a sharing form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharingUpdate {
    pub visibility: Visibility,
    pub shared_with: Vec<UserID>,
}

/// Get every user that `requester` can share an object with, ordered by email.
pub fn get_share_candidates(requester: UserID, connection: &Connection) -> Result<Vec<User>, Error> {
    let users = get_all_users(connection)?;

    Ok(users.into_iter().filter(|user| user.id != requester).collect())
}

/// Render the sharing form that submits to `endpoint` with a PUT request.
pub fn share_form_view(
    endpoint: &str,
    form: &ShareFormData,
    candidates: &[User],
    errors: &ShareFormErrors,
) -> Markup {
    html! {
        form
            hx-put=(endpoint)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Visibility" }

                @for visibility in Visibility::ALL {
                    @let id = format!("visibility-{visibility}");

                    div class="flex items-center gap-x-3 mb-2"
                    {
                        input
                            type="radio"
                            name="visibility"
                            id=(id)
                            value=(visibility.as_str())
                            class=(FORM_CHECKBOX_STYLE)
                            checked[form.visibility == visibility.as_str()];

                        label for=(id) class="text-sm text-gray-900 dark:text-white"
                        {
                            (visibility.label())
                        }
                    }
                }

                @if let Some(error_message) = &errors.visibility {
                    p class=(FORM_ERROR_STYLE) { (error_message) }
                }
            }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Shared with" }

                @if candidates.is_empty() {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "There are no other users to share with."
                    }
                }

                @for user in candidates {
                    @let id = format!("shared-with-{}", user.id);

                    div class="flex items-center gap-x-3 mb-2"
                    {
                        input
                            type="checkbox"
                            name="shared_with"
                            id=(id)
                            value=(user.id)
                            class=(FORM_CHECKBOX_STYLE)
                            checked[form.shared_with.contains(&user.id.as_i64())];

                        label for=(id) class="text-sm text-gray-900 dark:text-white"
                        {
                            (user)
                        }
                    }
                }

                @if let Some(error_message) = &errors.shared_with {
                    p class=(FORM_ERROR_STYLE) { (error_message) }
                }
            }

            (submit_button("Save"))
        }
    }
}
