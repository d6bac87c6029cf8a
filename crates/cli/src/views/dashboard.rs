// Dashboard view: aggregate counts

use sitewatch_core::StoreSummary;

use crate::output::field;

pub const WELCOME: &str =
    "Welcome to Sitewatch. Add a facility with `sitewatch facilities add` to get started.";

pub fn render(summary: &StoreSummary) -> String {
    let mut lines = vec![
        "System Status".to_string(),
        String::new(),
        field("Facilities", &summary.facilities.to_string()),
        field("Cameras", &summary.cameras.to_string()),
        field("Active", &summary.active_cameras.to_string()),
        field("Inactive", &summary.inactive_cameras.to_string()),
    ];
    if summary.facilities == 0 {
        lines.push(String::new());
        lines.push(WELCOME.to_string());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dashboard_shows_welcome() {
        let rendered = render(&StoreSummary::default());
        assert!(rendered.contains("Facilities:    0"));
        assert!(rendered.ends_with(WELCOME));
    }

    #[test]
    fn test_counts() {
        let rendered = render(&StoreSummary {
            facilities: 2,
            cameras: 3,
            active_cameras: 2,
            inactive_cameras: 1,
        });
        assert!(rendered.contains("Active:        2"));
        assert!(rendered.contains("Inactive:      1"));
        assert!(!rendered.contains(WELCOME));
    }
}
