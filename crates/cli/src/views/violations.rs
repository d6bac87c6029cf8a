// Violations view: detection events fetched from the backend

use sitewatch_core::{Camera, DetectionEvent};

use crate::output::table;
use crate::views::DATE_TIME_FORMAT;

pub const EMPTY: &str = "No violations recorded yet.";
pub const LOAD_FAILED: &str = "Violations could not be loaded";

/// Newest first; camera ids are resolved to names when the camera is known
pub fn render(events: &[DetectionEvent], cameras: &[Camera]) -> String {
    if events.is_empty() {
        return EMPTY.to_string();
    }
    let mut sorted: Vec<&DetectionEvent> = events.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let rows: Vec<Vec<String>> = sorted
        .into_iter()
        .map(|event| {
            let camera = cameras
                .iter()
                .find(|c| c.id == event.camera_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| event.camera_id.to_string());
            let confidence = event
                .confidence
                .map(|c| format!("{:.0}%", c * 100.0))
                .unwrap_or_default();
            vec![
                event.timestamp.format(DATE_TIME_FORMAT).to_string(),
                event.kind.label().to_string(),
                camera,
                confidence,
                event.image_url.clone(),
            ]
        })
        .collect();

    table(
        &[
            ("TIME", 16),
            ("TYPE", 10),
            ("CAMERA", 36),
            ("CONF", 4),
            ("IMAGE", 48),
        ],
        &rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sitewatch_core::ViolationType;
    use uuid::Uuid;

    fn event(camera_id: Uuid, hour: u32, kind: ViolationType) -> DetectionEvent {
        DetectionEvent {
            id: format!("evt-{}", hour),
            camera_id,
            facility_id: None,
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 5, 1, hour, 15, 0).unwrap(),
            kind,
            image_url: format!("/violations/{}.jpg", hour),
            confidence: Some(0.91),
        }
    }

    #[test]
    fn test_fetched_violations_populate_the_list_instead_of_being_dropped() {
        let gate = Camera::new(Uuid::now_v7(), "Gate", "10.0.0.5", 8080);
        let events = vec![
            event(gate.id, 8, ViolationType::NoGloves),
            event(Uuid::now_v7(), 9, ViolationType::NoHelmet),
        ];

        let rendered = render(&events, &[gate]);
        let rows: Vec<&str> = rendered.lines().skip(1).collect();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("01.05.2024 09:15"));
        assert!(rows[0].contains("No Helmet"));
        assert!(rows[1].contains("No Gloves"));
        assert!(rows[1].contains("Gate"));
        assert!(rows[1].contains("91%"));
    }

    #[test]
    fn test_detector_image_url_is_shown_in_full() {
        let camera_id = Uuid::now_v7();
        let mut detected = event(camera_id, 8, ViolationType::NoHelmet);
        detected.image_url = format!("/violations/violation_{}_20240501_081500.jpg", camera_id);

        let rendered = render(&[detected.clone()], &[]);
        let row = rendered.lines().nth(1).unwrap();

        assert!(row.ends_with(&detected.image_url));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render(&[], &[]), EMPTY);
    }

    #[test]
    fn test_unknown_type_is_shown_verbatim() {
        let events = vec![event(Uuid::now_v7(), 8, ViolationType::from("no_goggles"))];
        assert!(render(&events, &[]).contains("no_goggles"));
    }
}
