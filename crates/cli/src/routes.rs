// Navigation shell: the route table and sidebar

use anyhow::{Context, Result};
use serde::Serialize;
use sitewatch_core::AppStore;

use crate::views;

pub const APP_TITLE: &str = "PPE Monitoring System";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Dashboard,
    Facilities,
    Cameras,
    Violations,
}

impl Route {
    /// Sidebar order
    pub const ALL: [Route; 4] = [
        Route::Dashboard,
        Route::Facilities,
        Route::Cameras,
        Route::Violations,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Facilities => "/facilities",
            Route::Cameras => "/cameras",
            Route::Violations => "/violations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Facilities => "Facilities",
            Route::Cameras => "Cameras",
            Route::Violations => "Violations",
        }
    }

    /// Resolve a path; a trailing slash is ignored
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" if trimmed.starts_with('/') => "/",
            other => other,
        };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }
}

pub fn render_sidebar(active: Route) -> String {
    let mut lines = vec![APP_TITLE.to_string(), String::new()];
    for route in Route::ALL {
        let marker = if route == active { ">" } else { " " };
        lines.push(format!("{} {:<12} {}", marker, route.title(), route.path()));
    }
    lines.join("\n")
}

/// Render the view behind a route. Only the violations view talks to the backend.
pub async fn render(route: Route, store: &AppStore) -> Result<String> {
    let body = match route {
        Route::Dashboard => views::dashboard::render(&store.summary()),
        Route::Facilities => views::facilities::render(&store.facilities()),
        Route::Cameras => views::cameras::render(&store.facilities(), &store.cameras()),
        Route::Violations => {
            let events = store
                .backend()
                .list_violations()
                .await
                .context(views::violations::LOAD_FAILED)?;
            views::violations::render(&events, &store.cameras())
        }
    };
    Ok(format!("{}\n\n{}", render_sidebar(route), body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitewatch_core::memory::{BackendCall, BackendOp, MockBackendClient};
    use sitewatch_core::{DetectionEvent, Facility, ViolationType};
    use std::sync::Arc;
    use uuid::Uuid;

    #[test]
    fn test_resolves_known_paths() {
        assert_eq!(Route::from_path("/"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/facilities"), Some(Route::Facilities));
        assert_eq!(Route::from_path("/cameras/"), Some(Route::Cameras));
        assert_eq!(Route::from_path("/violations"), Some(Route::Violations));
    }

    #[test]
    fn test_rejects_unknown_paths() {
        assert_eq!(Route::from_path(""), None);
        assert_eq!(Route::from_path("/settings"), None);
        assert_eq!(Route::from_path("cameras"), None);
    }

    #[test]
    fn test_sidebar_marks_active_route() {
        let sidebar = render_sidebar(Route::Cameras);
        assert!(sidebar.starts_with(APP_TITLE));
        assert!(sidebar.contains("> Cameras      /cameras"));
        assert!(sidebar.contains("  Dashboard    /"));
    }

    #[tokio::test]
    async fn test_render_facilities_route() {
        let store = AppStore::new(Arc::new(MockBackendClient::new()));
        store
            .add_facility(Facility::new("Plant A", "1 Main St"))
            .unwrap();

        let page = render(Route::Facilities, &store).await.unwrap();
        assert!(page.contains("> Facilities"));
        assert!(page.contains("Plant A"));
    }

    #[tokio::test]
    async fn test_violations_route_renders_fetched_records_instead_of_discarding_them() {
        let backend = MockBackendClient::new();
        backend
            .set_violations(vec![DetectionEvent {
                id: "evt-1".to_string(),
                camera_id: Uuid::now_v7(),
                facility_id: None,
                timestamp: chrono::Utc::now(),
                kind: ViolationType::NoVest,
                image_url: "/violations/evt-1.jpg".to_string(),
                confidence: None,
            }])
            .await;
        let store = AppStore::new(Arc::new(backend.clone()));

        let page = render(Route::Violations, &store).await.unwrap();
        assert!(page.contains("> Violations"));
        assert!(page.contains("No Vest"));
        assert!(page.contains("/violations/evt-1.jpg"));
        assert_eq!(backend.calls().await, vec![BackendCall::ListViolations]);
    }

    #[tokio::test]
    async fn test_violations_route_reports_load_failure() {
        let backend = MockBackendClient::new();
        backend
            .fail(BackendOp::ListViolations, 500, "Database unavailable")
            .await;
        let store = AppStore::new(Arc::new(backend));

        let err = render(Route::Violations, &store).await.unwrap_err();
        assert_eq!(err.to_string(), views::violations::LOAD_FAILED);
        assert_eq!(err.root_cause().to_string(), "Database unavailable");
    }
}
