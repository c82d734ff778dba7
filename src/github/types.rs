use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CALENDAR_QUERY: &str = r#"
query($userName:String!) {
  user(login: $userName) {
    contributionsCollection {
      contributionCalendar {
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
    }
  }
}
"#;

pub const TOTAL_QUERY: &str = r#"
query($userName:String!, $from:DateTime!, $to:DateTime!) {
  user(login: $userName) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarVariables<'a> {
    pub user_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeVariables<'a> {
    pub user_name: &'a str,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserData<C> {
    pub user: Option<UserContributions<C>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContributions<C> {
    pub contributions_collection: ContributionsCollection<C>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection<C> {
    pub contribution_calendar: C,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributionCalendar {
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub contribution_count: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarTotal {
    pub total_contributions: u32,
}

/// Contributions made on a single JST day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyTotal {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total: u32,
}

impl ContributionCalendar {
    /// Count recorded for `date`, or zero when the calendar window doesn't include it.
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.weeks
            .iter()
            .flat_map(|week| week.contribution_days.iter())
            .find(|day| day.date == date)
            .map(|day| day.contribution_count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn calendar() -> ContributionCalendar {
        serde_json::from_value(serde_json::json!({
            "weeks": [
                { "contributionDays": [
                    { "contributionCount": 0, "date": "2024-06-08" },
                ]},
                { "contributionDays": [
                    { "contributionCount": 2, "date": "2024-06-09" },
                    { "contributionCount": 0, "date": "2024-06-10" },
                    { "contributionCount": 7, "date": "2024-06-15" },
                ]},
            ]
        }))
        .unwrap()
    }

    #[test]
    fn finds_day_in_any_week() {
        let calendar = calendar();
        assert_eq!(calendar.count_on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), 7);
        assert_eq!(calendar.count_on(NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()), 2);
    }

    #[test]
    fn missing_day_counts_as_zero() {
        let calendar = calendar();
        assert_eq!(calendar.count_on(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()), 0);
    }

    #[test]
    fn range_variables_use_camel_case_names() {
        let vars = RangeVariables {
            user_name: "octocat",
            from: "2024-06-09".into(),
            to: "2024-06-15".into(),
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            serde_json::json!({ "userName": "octocat", "from": "2024-06-09", "to": "2024-06-15" })
        );
    }
}
