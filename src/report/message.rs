use handlebars::{no_escape, Handlebars, RenderError};
use serde_json::json;

use crate::calendar::format_japanese;
use crate::config::MessageTemplates;
use crate::error::ConfigError;
use crate::github::{DailyCount, WeeklyTotal};

const NO_GRASS: &str = "no_grass";
const HAS_GRASS: &str = "has_grass";
const WEEKLY_SUMMARY: &str = "weekly_summary";

/// Renders notification bodies from handlebars templates.
///
/// Variables: `date` and `count` for the daily messages; `from`, `to` and
/// `total` for the weekly summary. Dates are rendered as `YYYY年MM月DD日`.
pub struct MessageRenderer {
    template_engine: Handlebars<'static>,
}

impl MessageRenderer {
    pub fn new(overrides: &MessageTemplates) -> Result<Self, ConfigError> {
        let mut template_engine = Handlebars::new();
        // Discord content is plain text.
        template_engine.register_escape_fn(no_escape);

        let templates = [
            (
                NO_GRASS,
                overrides.no_grass.as_deref(),
                include_str!("../../templates/no_grass.hbs"),
            ),
            (
                HAS_GRASS,
                overrides.has_grass.as_deref(),
                include_str!("../../templates/has_grass.hbs"),
            ),
            (
                WEEKLY_SUMMARY,
                overrides.weekly_summary.as_deref(),
                include_str!("../../templates/weekly_summary.hbs"),
            ),
        ];

        for (name, custom, default) in templates {
            template_engine
                .register_template_string(name, custom.unwrap_or(default))
                .map_err(|source| ConfigError::Template {
                    name,
                    source: Box::new(source),
                })?;
        }

        Ok(Self { template_engine })
    }

    #[cfg(test)]
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(&MessageTemplates::default())
    }

    /// Picks the "no grass" reminder or the acknowledgement depending on the count.
    pub fn daily(&self, daily: &DailyCount) -> Result<String, RenderError> {
        let name = if daily.count == 0 { NO_GRASS } else { HAS_GRASS };
        self.render(
            name,
            &json!({
                "date": format_japanese(daily.date),
                "count": daily.count,
            }),
        )
    }

    pub fn weekly(&self, weekly: &WeeklyTotal) -> Result<String, RenderError> {
        self.render(
            WEEKLY_SUMMARY,
            &json!({
                "from": format_japanese(weekly.from),
                "to": format_japanese(weekly.to),
                "total": weekly.total,
            }),
        )
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, RenderError> {
        Ok(self.template_engine.render(name, data)?.trim().to_string())
    }
}
