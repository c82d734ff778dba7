use std::time::Duration;

use chrono::NaiveDate;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::Serialize;

use super::types::{
    CalendarTotal, CalendarVariables, ContributionCalendar, DailyCount, GraphQlRequest,
    GraphQlResponse, RangeVariables, UserData, WeeklyTotal, CALENDAR_QUERY, TOTAL_QUERY,
};
use crate::calendar;
use crate::error::FetchError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads a single user's contribution calendar over the GitHub GraphQL API.
pub struct ContributionFetcher {
    client: Octocrab,
    username: String,
    timeout: Duration,
}

impl ContributionFetcher {
    pub fn new(token: String, username: String, api_url: &str) -> Result<Self, FetchError> {
        let mut builder = Octocrab::builder()
            .personal_token(token)
            .base_uri(api_url)
            .map_err(|e| FetchError::Client(e.to_string()))?;
        builder.add_retry_config(RetryConfig::None);
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            username,
            timeout: REQUEST_TIMEOUT,
        })
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub async fn fetch_today_count(&self) -> Result<DailyCount, FetchError> {
        self.fetch_count_on(calendar::today_jst()).await
    }

    /// Scans the default calendar window for `date`. A date outside the window
    /// reports zero contributions rather than an error.
    pub async fn fetch_count_on(&self, date: NaiveDate) -> Result<DailyCount, FetchError> {
        let request = GraphQlRequest {
            query: CALENDAR_QUERY,
            variables: CalendarVariables {
                user_name: &self.username,
            },
        };

        let contributions: ContributionCalendar = self.query(&request).await?;
        let count = contributions.count_on(date);
        tracing::debug!(user = %self.username, %date, count, "scanned contribution calendar");

        Ok(DailyCount { date, count })
    }

    pub async fn fetch_weekly_total(&self) -> Result<WeeklyTotal, FetchError> {
        self.fetch_week_ending(calendar::today_jst()).await
    }

    pub async fn fetch_week_ending(&self, today: NaiveDate) -> Result<WeeklyTotal, FetchError> {
        let (from, to) = calendar::week_ending(today);
        let request = GraphQlRequest {
            query: TOTAL_QUERY,
            variables: RangeVariables {
                user_name: &self.username,
                from: from.to_string(),
                to: to.to_string(),
            },
        };

        let totals: CalendarTotal = self.query(&request).await?;
        let total = totals.total_contributions;
        tracing::debug!(user = %self.username, %from, %to, total, "fetched weekly total");

        Ok(WeeklyTotal { from, to, total })
    }

    async fn query<V, C>(&self, request: &GraphQlRequest<'_, V>) -> Result<C, FetchError>
    where
        V: Serialize,
        C: serde::de::DeserializeOwned,
    {
        let body = tokio::time::timeout(self.timeout, self.post(request))
            .await
            .map_err(|_| {
                FetchError::Network(format!(
                    "no response within {}s",
                    self.timeout.as_secs_f32()
                ))
            })
            .and_then(|result| result)
            .map_err(|e| {
                tracing::warn!(error = %e, "GitHub GraphQL request failed");
                e
            })?;

        let response: GraphQlResponse<UserData<C>> =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let GraphQlResponse { data, errors } = response;
        match data.and_then(|data| data.user) {
            Some(user) => Ok(user.contributions_collection.contribution_calendar),
            None if !errors.is_empty() => {
                let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
                Err(FetchError::Query(messages.join("; ")))
            }
            None => Err(FetchError::Parse(format!(
                "response has no data.user for `{}`",
                self.username
            ))),
        }
    }

    /// Raw response body of a successful POST. The status is checked before
    /// anything is decoded.
    async fn post<V>(&self, request: &GraphQlRequest<'_, V>) -> Result<String, FetchError>
    where
        V: Serialize,
    {
        let response = self.client._post("/graphql", Some(request)).await?;
        let status = response.status();
        let body = self.client.body_to_string(response).await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: summarize(&body),
            });
        }

        Ok(body)
    }
}

/// GitHub's `message` field when the body is its JSON error shape, otherwise
/// the start of the raw body.
fn summarize(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message }) => message,
        Err(_) => body.trim().chars().take(200).collect(),
    }
}
