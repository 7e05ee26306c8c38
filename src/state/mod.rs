// State management module.
// Holds the blog view state, list selection and archive navigation.

pub mod blog;
pub mod list;
pub mod navigation;

pub use blog::{BlogStore, MAX_QUERY_CHARS, NOT_FOUND_MESSAGE, page_count};
pub use list::{LoadingState, SelectableList};
pub use navigation::{BreadcrumbNode, NavigationStack, ViewLevel};
