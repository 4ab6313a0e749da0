pub mod error;
pub mod fetcher;
pub(crate) mod loader;
pub(crate) mod normalizer;
