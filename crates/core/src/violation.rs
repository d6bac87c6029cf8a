// Detection event types
//
// Violations are produced by the detection backend; the client only lists them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::ViolationType;

/// A detected safety infraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionEvent {
    /// Backend-assigned id (`<camera>_<yyyymmdd_hhmmss>` for the current detector)
    pub id: String,
    pub camera_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<Uuid>,
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ViolationType,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_record() {
        let camera_id = Uuid::now_v7();
        let facility_id = Uuid::now_v7();
        let raw = serde_json::json!({
            "id": "evt-1",
            "cameraId": camera_id,
            "facilityId": facility_id,
            "timestamp": "2024-05-01T08:15:00Z",
            "type": "no_vest",
            "imageUrl": "/violations/a.jpg",
            "confidence": 0.87
        });

        let event: DetectionEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.kind, ViolationType::NoVest);
        assert_eq!(event.facility_id, Some(facility_id));
        assert_eq!(event.confidence, Some(0.87));
    }

    #[test]
    fn test_parses_detector_record_without_facility() {
        let camera_id = Uuid::now_v7();
        let raw = serde_json::json!({
            "id": format!("{camera_id}_20240501_081500"),
            "cameraId": camera_id,
            "timestamp": "2024-05-01T08:15:00.500000",
            "imageUrl": "/violations/violation_x.jpg",
            "type": "no_helmet"
        });

        let event: DetectionEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.camera_id, camera_id);
        assert!(event.facility_id.is_none());
        assert!(event.confidence.is_none());
    }
}
