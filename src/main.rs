use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod calendar;
mod config;
mod discord;
mod error;
mod github;
mod report;

use config::{Credentials, Settings};
use error::ConfigError;

#[derive(Parser)]
#[command(name = "grass-reporter")]
#[command(about = "Ping yourself on Discord when today's GitHub contribution graph is still empty")]
struct Cli {
    /// GitHub user whose contributions are checked
    #[arg(long, env = "GITHUB_USERNAME")]
    username: Option<String>,

    /// GitHub token used for the GraphQL API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Discord webhook that receives the notifications
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    webhook_url: Option<String>,

    /// Discord user ID to mention
    #[arg(long, env = "DISCORD_USER_ID")]
    user_id: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_URL)]
    github_api_url: String,

    /// Optional TOML settings file (schedule and message templates)
    #[arg(short, long, env = "GRASS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Check today's contributions and notify; sends the weekly summary on the summary day
    Check,

    /// Send the weekly summary now
    Weekly,

    /// Print today's count and this week's total without notifying
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = report_error(&mut io::stderr(), &err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let credentials =
        Credentials::from_parts(cli.username, cli.token, cli.webhook_url, cli.user_id)?;
    tracing::debug!(?credentials, "configuration loaded");

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let renderer = report::MessageRenderer::new(&settings.messages)?;

    let fetcher = github::ContributionFetcher::new(
        credentials.github_token,
        credentials.github_username,
        &cli.github_api_url,
    )?;
    let notifier = discord::Notifier::new(credentials.webhook_url, credentials.mention_id)?;
    let checker = report::GrassChecker::new(
        fetcher,
        notifier,
        renderer,
        settings.schedule.weekly_summary_day,
    );

    let today = calendar::today_jst();
    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => checker.run(today).await?,
        Commands::Weekly => {
            checker.send_weekly_summary(today).await?;
        }
        Commands::Status => {
            checker.status().await?;
        }
    }

    Ok(())
}

/// Each failure is reported once, here; lower layers only log.
fn report_error(out: &mut impl Write, err: &anyhow::Error) -> io::Result<()> {
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::Missing(missing)) => {
            writeln!(out, "Error: required environment variables are not set")?;
            writeln!(out, "Required environment variables:")?;
            for name in Credentials::REQUIRED_VARS {
                let marker = if missing.contains(&name) { " (missing)" } else { "" };
                writeln!(out, "  - {}{}", name, marker)?;
            }
            Ok(())
        }
        // Every error type already includes its cause in its message.
        _ => writeln!(out, "Error: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(github_api_url: String) -> Cli {
        Cli {
            username: Some("octocat".into()),
            token: Some("token".into()),
            webhook_url: Some("http://127.0.0.1:1/webhook".into()),
            user_id: Some("42".into()),
            github_api_url,
            config: None,
            command: None,
        }
    }

    #[tokio::test]
    async fn missing_value_fails_before_network() {
        let mut server = mockito::Server::new_async().await;
        let graphql = server.mock("POST", "/graphql").expect(0).create_async().await;

        let mut cli = cli(server.url());
        cli.user_id = None;
        let err = run(cli).await.unwrap_err();

        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Missing(missing)) => assert_eq!(missing, &vec!["DISCORD_USER_ID"]),
            _ => panic!("expected missing configuration, got {err:#}"),
        }
        graphql.assert_async().await;
    }

    #[tokio::test]
    async fn unreadable_settings_file_is_config_error() {
        let mut cli = cli("http://127.0.0.1:1".into());
        cli.config = Some(PathBuf::from("/nonexistent/grass.toml"));

        let err = run(cli).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn status_fails_when_github_is_unreachable() {
        let mut cli = cli("http://127.0.0.1:1".into());
        cli.command = Some(Commands::Status);

        let err = run(cli).await.unwrap_err();

        assert!(err.downcast_ref::<error::CheckError>().is_some(), "got {err:#}");
    }

    #[test]
    fn run_failure_is_reported_once() {
        let err = anyhow::Error::from(error::CheckError::Fetch(error::FetchError::Network(
            "connection reset".into(),
        )));
        let mut out = Vec::new();

        report_error(&mut out, &err).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert_eq!(out.matches("connection reset").count(), 1);
    }

    #[test]
    fn missing_values_list_every_required_variable() {
        let err = anyhow::Error::from(ConfigError::Missing(vec!["GITHUB_TOKEN"]));
        let mut out = Vec::new();

        report_error(&mut out, &err).unwrap();

        let out = String::from_utf8(out).unwrap();
        for name in Credentials::REQUIRED_VARS {
            assert!(out.contains(name), "{name} not listed in {out}");
        }
        assert!(out.contains("GITHUB_TOKEN (missing)"));
        assert!(!out.contains("GITHUB_USERNAME (missing)"));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "grass-reporter",
            "--username",
            "octocat",
            "--config",
            "grass.toml",
            "weekly",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Weekly)));
        assert_eq!(cli.config, Some(PathBuf::from("grass.toml")));
    }
}
