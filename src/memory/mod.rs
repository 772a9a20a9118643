pub mod search;
pub mod store;

/// Category applied when the caller does not supply one.
pub const DEFAULT_CATEGORY: &str = "General";
