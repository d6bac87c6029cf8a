// Cameras view: cameras grouped under their facility, one card per camera

use sitewatch_core::{Camera, CameraStatusReport, Facility, PollState};

use crate::output::field;

pub const NO_FACILITIES: &str = "Please add a facility first before adding cameras.";
pub const NO_CAMERAS: &str = "No cameras added to this facility yet";
pub const DELETE_FAILED: &str = "An unexpected error occurred while deleting the camera";

/// Every facility with its cameras, in store order
pub fn render(facilities: &[Facility], cameras: &[Camera]) -> String {
    if facilities.is_empty() {
        return NO_FACILITIES.to_string();
    }
    facilities
        .iter()
        .map(|facility| render_group(facility, cameras))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_group(facility: &Facility, cameras: &[Camera]) -> String {
    let mut lines = vec![format!("{} ({})", facility.name, facility.address)];
    let mut any = false;
    for camera in cameras.iter().filter(|c| c.facility_id == facility.id) {
        any = true;
        for line in render_card(camera).lines() {
            lines.push(format!("  {}", line));
        }
    }
    if !any {
        lines.push(format!("  {}", NO_CAMERAS));
    }
    lines.join("\n")
}

/// A single camera card
pub fn render_card(camera: &Camera) -> String {
    let mut lines = vec![
        format!("[{}] {}", camera.status.label(), camera.name),
        format!("  {}", camera.endpoint()),
    ];
    if !camera.monitored_violations.is_empty() {
        let labels: Vec<&str> = camera.monitored_violations.iter().map(|v| v.label()).collect();
        lines.push(format!("  Monitoring: {}", labels.join(", ")));
    }
    lines.push(format!("  ID: {}", camera.id));
    lines.join("\n")
}

pub fn render_detail(camera: &Camera, facility: Option<&Facility>) -> String {
    let monitored: Vec<&str> = camera.monitored_violations.iter().map(|v| v.label()).collect();
    let last_checked = camera
        .last_checked
        .map(|t| t.format("%d.%m.%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    [
        field("ID", &camera.id.to_string()),
        field("Name", &camera.name),
        field(
            "Facility",
            facility.map(|f| f.name.as_str()).unwrap_or("(unknown)"),
        ),
        field("Address", &camera.endpoint()),
        field("Status", camera.status.label()),
        field("Monitoring", &monitored.join(", ")),
        field("Last checked", &last_checked),
    ]
    .join("\n")
}

/// One status line
pub fn render_status(camera: &Camera, report: &CameraStatusReport) -> String {
    let mut line = format!(
        "{}  {}  checked {}",
        camera.name,
        report.status.label(),
        report.last_checked.format("%H:%M:%S")
    );
    if let Some(error) = &report.error {
        line.push_str(&format!("  ({})", error));
    }
    line
}

/// One line per completed poll
pub fn render_poll(camera: &Camera, state: &PollState) -> String {
    match (&state.status, &state.error) {
        (Some(report), _) => render_status(camera, report),
        (None, Some(error)) => format!("{}  error: {}", camera.name, error),
        (None, None) => format!("{}  checking...", camera.name),
    }
}
