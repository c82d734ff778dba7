//! Day arithmetic in Japan Standard Time.
//!
//! Contribution days are counted on GitHub's calendar for the user, which this
//! tool pins to UTC+9 no matter what timezone the host runs in.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

pub const JST_OFFSET_SECS: i32 = 9 * 60 * 60;

/// Days covered by the weekly summary, today included.
pub const WEEK_LENGTH_DAYS: i64 = 7;

pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

pub fn today_jst() -> NaiveDate {
    date_in_jst(Utc::now())
}

pub fn date_in_jst(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&jst()).date_naive()
}

/// Inclusive `(from, to)` range of the week ending on `today`.
pub fn week_ending(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(WEEK_LENGTH_DAYS - 1), today)
}

/// `2024年06月15日`
pub fn format_japanese(date: NaiveDate) -> String {
    date.format("%Y年%m月%d日").to_string()
}
