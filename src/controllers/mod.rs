pub mod dealer_controller;
pub mod feed_controller;
pub mod listing_controller;
