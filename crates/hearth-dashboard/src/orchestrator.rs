use std::sync::{Arc, Mutex};

use hearth_api::{HouseholdBackend, RequestError};
use hearth_core::{Connection, DashboardData, RefreshReport};

#[derive(Debug, Clone, PartialEq)]
/// Enumerates supported `DashboardView` values.
///
/// Zero connections is a distinct terminal rendering (onboarding), not an
/// empty-widgets state.
pub enum DashboardView {
    NotLoaded,
    NoConnections,
    NoWidgets { dashboard: DashboardData },
    Widgets { dashboard: DashboardData },
}

#[derive(Default)]
struct DashboardState {
    dashboard: Option<DashboardData>,
    connections: Vec<Connection>,
    refreshing: bool,
}

/// Coordinates the joined initial load and the serialized manual refresh.
pub struct DashboardOrchestrator {
    backend: Arc<dyn HouseholdBackend>,
    state: Mutex<DashboardState>,
}

impl DashboardOrchestrator {
    pub fn new(backend: Arc<dyn HouseholdBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(DashboardState::default()),
        }
    }

    /// Initial load: dashboard and connection list fetched concurrently and
    /// joined all-or-nothing. Either failure fails the load and leaves prior
    /// state untouched; rendering is meaningless without knowing which
    /// connections exist.
    pub async fn load(&self) -> Result<(), RequestError> {
        let (dashboard, connections) = tokio::try_join!(
            self.backend.fetch_dashboard(),
            self.backend.list_connections(),
        )?;
        let mut state = self.lock();
        state.dashboard = Some(dashboard);
        state.connections = connections;
        Ok(())
    }

    /// Manual refresh: ask the backend to recompute widget data, wait, then
    /// re-fetch. Read-after-write, so the two steps never run in parallel. A
    /// re-entrant call while a refresh is in flight returns `None` without
    /// issuing anything, which keeps overlapping refreshes idempotent in
    /// effect (last response wins).
    pub async fn refresh(&self) -> Result<Option<RefreshReport>, RequestError> {
        {
            let mut state = self.lock();
            if state.refreshing {
                return Ok(None);
            }
            state.refreshing = true;
        }

        let triggered = self.backend.trigger_refresh().await;
        let report = match triggered {
            Ok(report) => report,
            Err(error) => {
                self.lock().refreshing = false;
                return Err(error);
            }
        };

        let loaded = self.load().await;
        self.lock().refreshing = false;
        loaded?;
        Ok(Some(report))
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    pub fn connections(&self) -> Vec<Connection> {
        self.lock().connections.clone()
    }

    /// Selects the terminal rendering for the current state. Partial failure
    /// (`refresh_errors`, per-widget errors) never blocks the widget view.
    pub fn view(&self) -> DashboardView {
        let state = self.lock();
        let Some(dashboard) = state.dashboard.clone() else {
            return DashboardView::NotLoaded;
        };
        if state.connections.is_empty() {
            return DashboardView::NoConnections;
        }
        if dashboard.widgets.is_empty() {
            return DashboardView::NoWidgets { dashboard };
        }
        DashboardView::Widgets { dashboard }
    }

    /// Enabled connections carrying a frontend URL, for the quick-links row.
    pub fn quick_links(&self) -> Vec<(String, String)> {
        self.lock()
            .connections
            .iter()
            .filter(|connection| connection.enabled)
            .filter_map(|connection| {
                connection
                    .frontend_url
                    .clone()
                    .map(|url| (connection.display_name.clone(), url))
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DashboardState> {
        // Never held across an await.
        self.state.lock().expect("dashboard state lock poisoned")
    }
}
