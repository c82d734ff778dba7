pub mod client;
pub mod types;

pub use client::{ContributionFetcher, DEFAULT_API_URL};
pub use types::{DailyCount, WeeklyTotal};
