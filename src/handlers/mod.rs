pub mod get_health;
pub mod get_items;
pub mod get_version;
pub mod post_claim;
pub mod post_items;
pub mod util;
