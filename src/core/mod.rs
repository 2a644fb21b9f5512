pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{
    format_duration, months_between, parse_period, parse_period_at, try_parse_period, PeriodError,
    YearMonth,
};
pub use config::AppConfig;
pub use error::{PortfolioError, Result};
