pub mod crosstab_client;
pub mod overlay_client;
pub mod summary_client;
pub mod traffic_client;
