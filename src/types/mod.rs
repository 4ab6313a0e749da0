pub mod aggregated;
pub mod count_series;
pub mod filters;
pub mod resolution;
pub mod site;
pub mod span;
pub mod weather;
