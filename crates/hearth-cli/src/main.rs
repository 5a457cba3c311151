mod app_context;
mod cli_args;
mod render;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use hearth_agent::AgentSessionController;
use hearth_connections::ConnectionRegistry;
use hearth_core::{ConnectionCredentials, ConnectionDraft};
use hearth_dashboard::DashboardOrchestrator;

use crate::app_context::AppContext;
use crate::cli_args::{Cli, CliAuthScheme, Command, ConnectionsCommand, SessionsCommand};

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("HEARTH_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let context = AppContext::initialize(&cli)?;

    match cli.command {
        Command::Dashboard { refresh } => run_dashboard(&context, refresh).await,
        Command::Connections(command) => run_connections(&context, command).await,
        Command::Chat { message, session } => {
            run_chat(&context, &message, session.as_deref()).await
        }
        Command::Sessions(command) => run_sessions(&context, command).await,
    }
}

async fn run_dashboard(context: &AppContext, refresh: bool) -> Result<()> {
    let orchestrator = DashboardOrchestrator::new(context.backend.clone());
    if refresh {
        if let Some(report) = orchestrator.refresh().await? {
            println!("{}", report.message);
        }
    } else {
        orchestrator.load().await?;
    }
    print_lines(render::render_dashboard(
        &orchestrator.view(),
        &orchestrator.quick_links(),
    ));
    Ok(())
}

async fn run_connections(context: &AppContext, command: ConnectionsCommand) -> Result<()> {
    let registry = ConnectionRegistry::new(context.backend.clone());
    match command {
        ConnectionsCommand::List => {
            registry.list().await?;
            print_lines(render::render_connections(&registry.connections()));
        }
        ConnectionsCommand::Add {
            service_type,
            display_name,
            base_url,
            frontend_url,
            auth_type,
            username,
            password,
            api_key,
        } => {
            let credentials = match auth_type {
                CliAuthScheme::ApiKey => ConnectionCredentials::ApiKey {
                    api_key: api_key.unwrap_or_default(),
                },
                _ => ConnectionCredentials::Password {
                    username: username.unwrap_or_default(),
                    password: password.unwrap_or_default(),
                },
            };
            let draft = ConnectionDraft {
                service_type: service_type.into(),
                display_name,
                base_url,
                frontend_url,
                auth_type: auth_type.into(),
                credentials,
                endpoints: Vec::new(),
            };
            registry.create(&draft).await?;
            println!("Connection created.");
            print_lines(render::render_connections(&registry.connections()));
        }
        ConnectionsCommand::Test { id } => {
            let report = registry.test(&id).await?;
            let verdict = if report.success { "ok" } else { "failed" };
            println!("{verdict}: {}", report.message);
        }
        ConnectionsCommand::Toggle { id } => {
            registry.list().await?;
            let enabled = registry.toggle(&id).await?;
            println!(
                "Connection {id} is now {}.",
                if enabled { "enabled" } else { "disabled" }
            );
        }
        ConnectionsCommand::Delete { id } => {
            registry.delete(&id).await?;
            println!("Connection {id} deleted.");
        }
    }
    Ok(())
}

async fn run_chat(context: &AppContext, message: &str, session: Option<&str>) -> Result<()> {
    let controller = AgentSessionController::new(context.backend.clone());
    if let Some(session_id) = session {
        controller.load_session(session_id).await?;
    }

    controller.send(message).await?;

    let transcript = controller.transcript();
    let tail = transcript.len().saturating_sub(2);
    print_lines(render::render_transcript(&transcript[tail..]));
    if let Some(session_id) = controller.active_session_id() {
        println!("session: {session_id}");
    }
    Ok(())
}

async fn run_sessions(context: &AppContext, command: SessionsCommand) -> Result<()> {
    let controller = AgentSessionController::new(context.backend.clone());
    match command {
        SessionsCommand::List => {
            controller.list_sessions().await?;
            print_lines(render::render_sessions(&controller.sessions()));
        }
        SessionsCommand::Show { id } => {
            controller.load_session(&id).await?;
            print_lines(render::render_transcript(&controller.transcript()));
        }
        SessionsCommand::Delete { id } => {
            controller.delete_session(&id).await?;
            println!("Session {id} deleted.");
        }
    }
    Ok(())
}
