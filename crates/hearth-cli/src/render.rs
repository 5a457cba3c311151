use hearth_core::{ChatMessage, ChatSession, Connection};
use hearth_dashboard::{render_widget, DashboardView};

/// Renders the dashboard view to stdout lines. Partial failures are
/// additive: refresh errors print above whatever widget data loaded.
pub fn render_dashboard(view: &DashboardView, quick_links: &[(String, String)]) -> Vec<String> {
    match view {
        DashboardView::NotLoaded => vec!["Dashboard not loaded.".to_string()],
        DashboardView::NoConnections => vec![
            "Welcome to Household.".to_string(),
            "Connect your services to see your dashboard: hearth connections add --help".to_string(),
        ],
        DashboardView::NoWidgets { dashboard } => {
            let mut lines = Vec::new();
            if let Some(stamp) = dashboard.last_refreshed_at.as_deref() {
                lines.push(format!("Updated {stamp}"));
            }
            lines.push(
                "No data yet. Try refreshing to fetch data from your connected services."
                    .to_string(),
            );
            lines
        }
        DashboardView::Widgets { dashboard } => {
            let mut lines = Vec::new();
            if let Some(stamp) = dashboard.last_refreshed_at.as_deref() {
                lines.push(format!("Updated {stamp}"));
            }
            for error in &dashboard.refresh_errors {
                lines.push(format!("refresh error: {error}"));
            }
            if !quick_links.is_empty() {
                let joined = quick_links
                    .iter()
                    .map(|(name, url)| format!("{name} <{url}>"))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("Quick links: {joined}"));
            }
            for widget in &dashboard.widgets {
                lines.push(String::new());
                lines.extend(render_widget(widget));
            }
            lines
        }
    }
}

pub fn render_connections(connections: &[Connection]) -> Vec<String> {
    if connections.is_empty() {
        return vec!["No connections yet. Add a service connection to get started.".to_string()];
    }
    let mut lines = Vec::new();
    for connection in connections {
        let status = if connection.enabled { "enabled" } else { "disabled" };
        lines.push(format!(
            "{}  {} [{}] {}",
            connection.id,
            connection.display_name,
            connection.service_type.as_str(),
            status
        ));
        lines.push(format!("  {}", connection.base_url));
        if let Some(synced_at) = connection.last_sync_at.as_deref() {
            let sync_status = connection.last_sync_status.as_deref().unwrap_or("unknown");
            lines.push(format!("  last sync: {synced_at} ({sync_status})"));
        }
        if let Some(error) = connection.last_sync_error.as_deref() {
            lines.push(format!("  sync error: {error}"));
        }
    }
    lines
}

pub fn render_sessions(sessions: &[ChatSession]) -> Vec<String> {
    if sessions.is_empty() {
        return vec!["No previous chats".to_string()];
    }
    sessions
        .iter()
        .map(|session| {
            format!(
                "{}  {} ({} msgs, updated {})",
                session.id, session.title, session.message_count, session.updated_at
            )
        })
        .collect()
}

pub fn render_transcript(messages: &[ChatMessage]) -> Vec<String> {
    messages
        .iter()
        .map(|message| format!("{}> {}", message.role.as_str(), message.content))
        .collect()
}
