// Blog content module.
// HTTP client, post types, ingestion validation and the caching content store.

pub mod client;
pub mod endpoints;
pub mod fallback;
pub mod store;
pub mod types;
pub mod validate;

pub use fallback::{category_icon, fallback_posts};
pub use store::ContentStore;
pub use types::*;
