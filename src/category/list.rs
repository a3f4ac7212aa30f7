//! The categories page, the active/archived tabs and the category tables.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    category::{CategoryState, db::get_visible_categories, domain::Category},
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, LINK_STYLE, OFFCANVAS_TARGET,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        loading_spinner, offcanvas,
    },
    navigation::NavBar,
    shared_object::{SharedObject, Visibility},
};

const TABLE_CONTAINER_ID: &str = "category-table";

/// Render the categories page, which loads the category list after the page loads.
pub async fn get_categories_page() -> Response {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    div class="w-40"
                    {
                        button
                            type="button"
                            hx-get=(endpoints::NEW_CATEGORY_VIEW)
                            hx-target=(OFFCANVAS_TARGET)
                            class=(BUTTON_PRIMARY_STYLE)
                        {
                            "Add category"
                        }
                    }
                }

                div hx-get=(endpoints::CATEGORIES_LIST) hx-trigger="load"
                {
                    (loading_spinner())
                }
            }
        }

        (offcanvas())
    };

    base("Categories", &content).into_response()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tab {
    Active,
    Archived,
}

impl Tab {
    fn endpoint(self) -> &'static str {
        match self {
            Tab::Active => endpoints::ACTIVE_CATEGORIES_TABLE,
            Tab::Archived => endpoints::ARCHIVED_CATEGORIES_TABLE,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Active => "Active",
            Tab::Archived => "Archived",
        }
    }
}

/// Render the active/archived tabs with the active table loading below them.
pub async fn get_categories_list() -> Response {
    let tab_style = "inline-block p-4 border-b-2 border-transparent rounded-t-lg \
        hover:text-gray-600 hover:border-gray-300 dark:hover:text-gray-300 \
        aria-selected:text-blue-600 aria-selected:border-blue-600";
    let table_target = format!("#{TABLE_CONTAINER_ID}");

    html! {
        div
        {
            div
                role="tablist"
                class="flex flex-wrap text-sm font-medium text-center text-gray-500 \
                    border-b border-gray-200 dark:text-gray-400 dark:border-gray-700"
            {
                @for tab in [Tab::Active, Tab::Archived] {
                    button
                        type="button"
                        role="tab"
                        aria-selected=(if tab == Tab::Active { "true" } else { "false" })
                        hx-get=(tab.endpoint())
                        hx-target=(table_target)
                        class=(tab_style)
                    {
                        (tab.title())
                    }
                }
            }

            div id=(TABLE_CONTAINER_ID) hx-get=(Tab::Active.endpoint()) hx-trigger="load"
            {
                (loading_spinner())
            }
        }
    }
    .into_response()
}

/// Render the table of active categories visible to the user.
pub async fn get_active_categories_table(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    categories_table(&state, user_id, Tab::Active)
}

/// Render the table of archived categories visible to the user.
pub async fn get_archived_categories_table(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    categories_table(&state, user_id, Tab::Archived)
}

fn categories_table(state: &CategoryState, user_id: UserID, tab: Tab) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match get_visible_categories(user_id, tab == Tab::Active, &connection) {
        Ok(categories) => categories_table_view(&categories, user_id, tab).into_response(),
        Err(error) => {
            tracing::error!("could not get categories for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn sharing_badge(category: &Category, user_id: UserID) -> Option<&'static str> {
    let sharing = category.sharing();

    if category.is_unowned() {
        Some("Unowned")
    } else if category.is_recipient(user_id) {
        Some("Shared with you")
    } else if sharing.owner != Some(user_id) && sharing.visibility == Visibility::Public {
        Some("Public")
    } else if sharing.visibility == Visibility::Shared {
        Some("Shared")
    } else {
        None
    }
}

fn table_row(category: &Category, user_id: UserID) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id);
    let share_url = format_endpoint(endpoints::SHARE_CATEGORY_VIEW, category.id);
    let delete_url = format_endpoint(endpoints::DELETE_CATEGORY, category.id);
    let take_ownership_url = format_endpoint(endpoints::TAKE_CATEGORY_OWNERSHIP, category.id);
    let is_recipient = category.is_recipient(user_id);
    let confirm_message = if is_recipient {
        format!("Stop sharing '{}' with you?", category.name)
    } else {
        format!("Are you sure you want to delete '{}'?", category.name)
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (category.name) }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-2"
                {
                    @if category.mute {
                        span class=(BADGE_STYLE) { "Muted" }
                    }
                    @if let Some(badge) = sharing_badge(category, user_id) {
                        span class=(BADGE_STYLE) { (badge) }
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    @if category.can_edit(user_id) {
                        button
                            type="button"
                            hx-get=(edit_url)
                            hx-target=(OFFCANVAS_TARGET)
                            class=(LINK_STYLE)
                        {
                            "Edit"
                        }

                        button
                            type="button"
                            hx-get=(share_url)
                            hx-target=(OFFCANVAS_TARGET)
                            class=(LINK_STYLE)
                        {
                            "Share"
                        }
                    }

                    @if category.is_unowned() {
                        button
                            type="button"
                            hx-get=(take_ownership_url)
                            hx-swap="none"
                            hx-target-error="#alert-container"
                            class=(LINK_STYLE)
                        {
                            "Take ownership"
                        }
                    }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        hx-swap="none"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        @if is_recipient { "Remove" } @else { "Delete" }
                    }
                }
            }
        }
    }
}

fn categories_table_view(categories: &[Category], user_id: UserID, tab: Tab) -> Markup {
    let empty_message = match tab {
        Tab::Active => "No active categories.",
        Tab::Archived => "No archived categories.",
    };

    html! {
        div hx-get=(tab.endpoint()) hx-trigger="updated from:body" hx-swap="outerHTML"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for category in categories {
                        (table_row(category, user_id))
                    }

                    @if categories.is_empty() {
                        tr
                        {
                            td
                                colspan="3"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                (empty_message)
                            }
                        }
                    }
                }
            }
        }
    }
}
