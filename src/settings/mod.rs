//! User settings: display and locale preferences for each user.

mod db;
mod domain;
mod page;

pub use db::{create_default_user_settings, create_user_settings_table};
pub use page::{get_settings_page, update_settings};

#[cfg(test)]
pub use db::get_user_settings;
