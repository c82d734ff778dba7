use std::fmt;
use std::path::Path;

use chrono::Weekday;
use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// Values that must all be present before any network call is made.
pub struct Credentials {
    pub github_username: String,
    pub github_token: String,
    pub webhook_url: String,
    pub mention_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("github_username", &self.github_username)
            .field("github_token", &"<redacted>")
            .field("webhook_url", &"<redacted>")
            .field("mention_id", &self.mention_id)
            .finish()
    }
}

impl Credentials {
    pub const REQUIRED_VARS: [&'static str; 4] = [
        "GITHUB_USERNAME",
        "GITHUB_TOKEN",
        "DISCORD_WEBHOOK_URL",
        "DISCORD_USER_ID",
    ];

    /// Blank values are treated the same as unset ones.
    pub fn from_parts(
        github_username: Option<String>,
        github_token: Option<String>,
        webhook_url: Option<String>,
        mention_id: Option<String>,
    ) -> Result<Self, ConfigError> {
        let values = [github_username, github_token, webhook_url, mention_id]
            .map(|value| value.filter(|v| !v.trim().is_empty()));

        let missing: Vec<&'static str> = Self::REQUIRED_VARS
            .iter()
            .zip(values.iter())
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        match values {
            [Some(github_username), Some(github_token), Some(webhook_url), Some(mention_id)] => {
                Ok(Credentials {
                    github_username,
                    github_token,
                    webhook_url,
                    mention_id,
                })
            }
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}

/// Optional settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schedule: ScheduleSettings,
    pub messages: MessageTemplates,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    #[serde(deserialize_with = "weekday_from_str")]
    pub weekly_summary_day: Weekday,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        ScheduleSettings {
            weekly_summary_day: Weekday::Sat,
        }
    }
}

/// Handlebars overrides for the built-in messages.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    pub no_grass: Option<String>,
    pub has_grass: Option<String>,
    pub weekly_summary: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: display,
            source,
        })
    }
}

fn weekday_from_str<'de, D>(deserializer: D) -> Result<Weekday, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse::<Weekday>()
        .map_err(|_| serde::de::Error::custom(format!("unknown day of week: {}", raw)))
}
