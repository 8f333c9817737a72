pub mod badge_filter;
pub mod directory_cache;
