use clap::{Parser, Subcommand, ValueEnum};

use hearth_core::{AuthScheme, ServiceKind};

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "hearth",
    about = "Command-line client for the Household aggregation backend",
    version
)]
/// Public struct `Cli` used across Hearth components.
pub struct Cli {
    #[arg(
        long,
        env = "HEARTH_API_BASE",
        default_value = "http://localhost:8000",
        help = "Base URL of the household backend."
    )]
    pub api_base: String,

    #[arg(
        long,
        env = "HEARTH_AUTH_TOKEN",
        help = "Bearer token attached to every request. Issued out of band by the authentication provider."
    )]
    pub auth_token: Option<String>,

    #[arg(
        long,
        env = "HEARTH_REQUEST_TIMEOUT_MS",
        default_value_t = hearth_api::DEFAULT_REQUEST_TIMEOUT_MS,
        value_parser = parse_positive_u64,
        help = "Per-request timeout in milliseconds."
    )]
    pub request_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
/// Enumerates supported top-level `Command` values.
pub enum Command {
    /// Show the aggregated dashboard.
    Dashboard {
        #[arg(long, help = "Trigger a backend refresh before fetching.")]
        refresh: bool,
    },
    /// Manage service connections.
    #[command(subcommand)]
    Connections(ConnectionsCommand),
    /// Send one message to the agent.
    Chat {
        message: String,
        #[arg(long, help = "Continue an existing session instead of starting a draft.")]
        session: Option<String>,
    },
    /// Manage agent chat sessions.
    #[command(subcommand)]
    Sessions(SessionsCommand),
}

#[derive(Debug, Subcommand)]
/// Enumerates supported `ConnectionsCommand` values.
pub enum ConnectionsCommand {
    /// List configured connections.
    List,
    /// Create a connection.
    Add {
        #[arg(long, value_enum)]
        service_type: CliServiceKind,
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        base_url: String,
        #[arg(long)]
        frontend_url: Option<String>,
        #[arg(long, value_enum, default_value = "jwt-password")]
        auth_type: CliAuthScheme,
        #[arg(long, help = "Username for jwt-password and jwt-json auth.")]
        username: Option<String>,
        #[arg(long, help = "Password for jwt-password and jwt-json auth.")]
        password: Option<String>,
        #[arg(long, help = "API key for api-key auth.")]
        api_key: Option<String>,
    },
    /// Run a reachability test against one connection.
    Test { id: String },
    /// Flip a connection's enabled flag.
    Toggle { id: String },
    /// Delete a connection.
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
/// Enumerates supported `SessionsCommand` values.
pub enum SessionsCommand {
    /// List chat sessions.
    List,
    /// Print one session's transcript.
    Show { id: String },
    /// Delete a chat session.
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliServiceKind {
    Track,
    Calendar,
    Other,
}

impl From<CliServiceKind> for ServiceKind {
    fn from(kind: CliServiceKind) -> Self {
        match kind {
            CliServiceKind::Track => Self::Track,
            CliServiceKind::Calendar => Self::Calendar,
            CliServiceKind::Other => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliAuthScheme {
    JwtPassword,
    JwtJson,
    ApiKey,
}

impl From<CliAuthScheme> for AuthScheme {
    fn from(scheme: CliAuthScheme) -> Self {
        match scheme {
            CliAuthScheme::JwtPassword => Self::JwtPassword,
            CliAuthScheme::JwtJson => Self::JwtJson,
            CliAuthScheme::ApiKey => Self::ApiKey,
        }
    }
}
