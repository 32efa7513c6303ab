//! Shared domain types for powder-watch.

pub mod config;
pub mod error;
pub mod locations;
pub mod types;

pub use error::Error;
pub use types::{
    value_at, AlertLog, BestWindow, DailyBlock, ForecastSnapshot, HourlyBlock, LoadStatus,
    Location, Tier,
};
