mod client;
mod time;
mod types;

pub use client::{is_connectivity_error, SchedulerClient};
pub use time::{format_hhmm, format_timestamp, parse_range_text};
pub use types::*;
