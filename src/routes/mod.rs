pub mod dealer_routes;
pub mod feed_routes;
pub mod listing_routes;
