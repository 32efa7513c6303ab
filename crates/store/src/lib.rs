//! Caching and bulk prefetch for forecast data.

pub mod cache;
pub mod loader;

pub use cache::{DailyCache, TtlCache};
pub use loader::BatchLoader;
