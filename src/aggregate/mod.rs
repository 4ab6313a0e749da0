pub mod crosstab;
pub mod error;
pub mod overlay;
pub mod resample;
pub mod summary;
