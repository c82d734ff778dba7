use chrono::{Datelike, Local, NaiveDate, Weekday};

use super::message::MessageRenderer;
use crate::discord::Notifier;
use crate::error::CheckError;
use crate::github::{ContributionFetcher, DailyCount, WeeklyTotal};

/// Runs the fetch, decide, notify sequence once.
pub struct GrassChecker {
    fetcher: ContributionFetcher,
    notifier: Notifier,
    renderer: MessageRenderer,
    weekly_summary_day: Weekday,
}

impl GrassChecker {
    pub fn new(
        fetcher: ContributionFetcher,
        notifier: Notifier,
        renderer: MessageRenderer,
        weekly_summary_day: Weekday,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            renderer,
            weekly_summary_day,
        }
    }

    /// Daily check, then the weekly summary when `today` is the summary day.
    ///
    /// The weekly summary goes out even if the daily check failed, and its own
    /// failure is only logged: the returned result reflects the daily check.
    pub async fn run(&self, today: NaiveDate) -> Result<(), CheckError> {
        let daily = self.check_and_notify(today).await;

        if today.weekday() == self.weekly_summary_day {
            if let Err(err) = self.send_weekly_summary(today).await {
                tracing::warn!(error = %err, "weekly summary was not sent");
                eprintln!("Weekly summary failed: {}", err);
            }
        }

        daily.map(|_| ())
    }

    pub async fn check_and_notify(&self, today: NaiveDate) -> Result<DailyCount, CheckError> {
        println!(
            "[{}] Checking contributions for {}...",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            self.fetcher.username()
        );

        let daily = self.fetcher.fetch_count_on(today).await?;
        println!("Contributions on {}: {}", daily.date, daily.count);

        let body = self.renderer.daily(&daily)?;
        self.send(&body).await?;

        Ok(daily)
    }

    pub async fn send_weekly_summary(&self, today: NaiveDate) -> Result<WeeklyTotal, CheckError> {
        let weekly = self.fetcher.fetch_week_ending(today).await?;
        println!(
            "Contributions from {} to {}: {}",
            weekly.from, weekly.to, weekly.total
        );

        let body = self.renderer.weekly(&weekly)?;
        self.send(&body).await?;

        Ok(weekly)
    }

    /// Prints today's count and the running weekly total without notifying anyone.
    pub async fn status(&self) -> Result<(DailyCount, WeeklyTotal), CheckError> {
        let daily = self.fetcher.fetch_today_count().await?;
        println!("{}: {} contributions", daily.date, daily.count);

        let weekly = self.fetcher.fetch_weekly_total().await?;
        println!("{} to {}: {} contributions", weekly.from, weekly.to, weekly.total);

        Ok((daily, weekly))
    }

    async fn send(&self, body: &str) -> Result<(), CheckError> {
        self.notifier.notify(body).await?;
        println!("Discord notification sent");
        Ok(())
    }
}
