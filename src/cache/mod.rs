// Cache module.
// In-memory expiring cache for fetched posts, plus per-user file locations.

pub mod paths;
pub mod store;

pub use store::MemoryCache;
