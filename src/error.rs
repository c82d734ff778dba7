use thiserror::Error;

/// Why today's (or this week's) contribution count could not be determined.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build GitHub client: {0}")]
    Client(String),

    #[error("network error talking to GitHub: {0}")]
    Network(String),

    #[error("GitHub returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("GitHub GraphQL query failed: {0}")]
    Query(String),

    #[error("unexpected GitHub response: {0}")]
    Parse(String),
}

// Only transport-level failures reach this: statuses and bodies are
// inspected by the fetcher itself.
impl From<octocrab::Error> for FetchError {
    fn from(err: octocrab::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("failed to build webhook client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("network error posting to webhook: {0}")]
    Network(#[from] reqwest::Error),

    #[error("webhook responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid message template `{name}`: {source}")]
    Template {
        name: &'static str,
        #[source]
        source: Box<handlebars::TemplateError>,
    },
}

/// Failure of one notification run.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("could not determine contributions: {0}")]
    Fetch(#[from] FetchError),

    #[error("could not render message: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("could not send Discord notification: {0}")]
    Send(#[from] SendError),
}
