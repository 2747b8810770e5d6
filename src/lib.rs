pub mod catalog;
pub mod collector;
pub mod config;
pub mod encode;
pub mod source;
pub mod status;
pub use catalog::Statistic;
pub use metric::{DataPoint, MetricLine};
pub use window::TimeWindow;

mod metric;
mod window;
