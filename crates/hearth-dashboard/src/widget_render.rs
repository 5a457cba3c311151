use serde_json::Value;

use hearth_core::{ServiceKind, WidgetData};

/// Widgets show at most this many entries; the remainder collapses into an
/// explicit overflow line rather than vanishing.
pub const WIDGET_DISPLAY_LIMIT: usize = 10;

const UNTITLED_PLACEHOLDER: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `WidgetRenderer` values.
///
/// Render strategy is selected purely by the widget's service kind. A new
/// service kind adds a variant and a dispatch arm; existing renderers stay
/// untouched.
pub enum WidgetRenderer {
    TaskList,
    EventList,
    Generic,
}

impl WidgetRenderer {
    pub fn for_kind(kind: ServiceKind) -> Self {
        match kind {
            ServiceKind::Track => Self::TaskList,
            ServiceKind::Calendar => Self::EventList,
            ServiceKind::Other => Self::Generic,
        }
    }

    fn render_body(self, widget: &WidgetData) -> Vec<String> {
        match self {
            Self::TaskList => render_tasks(widget.data.as_ref()),
            Self::EventList => render_events(widget.data.as_ref()),
            Self::Generic => render_generic(widget.data.as_ref()),
        }
    }
}

/// Renders one widget to display lines. Total over arbitrary payloads: a
/// populated `error` is authoritative and renders inline, and every absent
/// field falls back to a placeholder instead of failing.
pub fn render_widget(widget: &WidgetData) -> Vec<String> {
    let mut lines = vec![widget.label.clone()];
    if let Some(error) = widget.error.as_deref() {
        lines.push(format!("error: {error}"));
        return lines;
    }
    lines.extend(WidgetRenderer::for_kind(widget.service_type).render_body(widget));
    lines
}

fn render_tasks(data: Option<&Value>) -> Vec<String> {
    let Some(tasks) = data.and_then(Value::as_array) else {
        return vec!["No tasks".to_string()];
    };
    if tasks.is_empty() {
        return vec!["No tasks".to_string()];
    }

    let mut lines = Vec::new();
    for task in tasks.iter().take(WIDGET_DISPLAY_LIMIT) {
        let marker = status_marker(str_field(task, "status"));
        let name = str_field(task, "name")
            .or_else(|| str_field(task, "title"))
            .unwrap_or(UNTITLED_PLACEHOLDER);
        let mut line = format!("{marker} {name}");
        if let Some(project) = project_name(task) {
            line.push_str(&format!(" ({project})"));
        }
        lines.push(line);
    }
    push_overflow(&mut lines, tasks.len());
    lines
}

fn render_events(data: Option<&Value>) -> Vec<String> {
    let Some(events) = data.and_then(Value::as_array) else {
        return vec!["No events".to_string()];
    };
    if events.is_empty() {
        return vec!["No events".to_string()];
    }

    let mut lines = Vec::new();
    for event in events.iter().take(WIDGET_DISPLAY_LIMIT) {
        let title = str_field(event, "title")
            .or_else(|| str_field(event, "name"))
            .unwrap_or(UNTITLED_PLACEHOLDER);
        let mut line = title.to_string();
        if let Some(start) = str_field(event, "start_time").or_else(|| str_field(event, "time")) {
            line.push_str(&format!(" {start}"));
            if let Some(end) = str_field(event, "end_time") {
                line.push_str(&format!("-{end}"));
            }
        }
        if event.get("all_day").and_then(Value::as_bool) == Some(true) {
            line.push_str(" (all day)");
        }
        if let Some(date) = str_field(event, "date") {
            line.push_str(&format!(" [{date}]"));
        }
        lines.push(line);
    }
    push_overflow(&mut lines, events.len());
    lines
}

fn render_generic(data: Option<&Value>) -> Vec<String> {
    match data {
        None | Some(Value::Null) => vec!["No data".to_string()],
        Some(Value::Array(items)) => vec![format!("{} items", items.len())],
        Some(value) => serde_json::to_string_pretty(value)
            .unwrap_or_else(|_| value.to_string())
            .lines()
            .map(str::to_string)
            .collect(),
    }
}

fn push_overflow(lines: &mut Vec<String>, total: usize) {
    if total > WIDGET_DISPLAY_LIMIT {
        lines.push(format!("+{} more", total - WIDGET_DISPLAY_LIMIT));
    }
}

/// 3-way completion indicator: completed, in progress, anything else pending.
fn status_marker(status: Option<&str>) -> &'static str {
    match status {
        Some("completed") => "[x]",
        Some("in_progress") => "[~]",
        _ => "[ ]",
    }
}

fn str_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn project_name(task: &Value) -> Option<&str> {
    str_field(task, "project_name").or_else(|| {
        task.get("project")
            .and_then(|project| project.get("name"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    })
}
