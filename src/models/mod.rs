pub mod profile;
pub mod search_filters;
