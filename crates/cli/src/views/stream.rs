// Stream viewer
//
// The video itself is served by the backend; the viewer shows where to open
// it and keeps re-checking the camera so a dead stream is reported.

use sitewatch_core::{Camera, PollState};

pub const NOT_ACTIVE: &str = "Camera is not active";
pub const CHECK_FAILED: &str = "Camera status could not be checked";

/// What the viewer currently shows in place of the video
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// First check still running
    Connecting,
    Live(String),
    Unavailable(&'static str),
}

impl StreamFrame {
    pub fn from_poll(stream_url: &str, state: &PollState) -> Self {
        match (&state.status, &state.error) {
            (Some(report), _) if report.status.is_active() => {
                StreamFrame::Live(stream_url.to_string())
            }
            (Some(_), _) => StreamFrame::Unavailable(NOT_ACTIVE),
            (None, Some(_)) => StreamFrame::Unavailable(CHECK_FAILED),
            (None, None) => StreamFrame::Connecting,
        }
    }
}

pub fn render_header(camera: &Camera) -> String {
    format!("{} - Live View\nIP: {}", camera.name, camera.endpoint())
}

pub fn render_frame(frame: &StreamFrame) -> String {
    match frame {
        StreamFrame::Connecting => "Connecting...".to_string(),
        StreamFrame::Live(url) => format!("Stream: {}", url),
        StreamFrame::Unavailable(message) => format!("! {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitewatch_core::{CameraStatus, CameraStatusReport};

    const URL: &str = "http://localhost:5000/api/stream/abc";

    fn state(status: Option<CameraStatus>, error: Option<&str>) -> PollState {
        PollState {
            status: status.map(|status| CameraStatusReport {
                status,
                last_checked: chrono::Utc::now(),
                error: None,
            }),
            error: error.map(str::to_string),
            is_loading: false,
            polls: 1,
        }
    }

    #[test]
    fn test_active_camera_shows_stream() {
        let frame = StreamFrame::from_poll(URL, &state(Some(CameraStatus::Active), None));
        assert_eq!(render_frame(&frame), format!("Stream: {}", URL));
    }

    #[test]
    fn test_inactive_camera() {
        let frame = StreamFrame::from_poll(URL, &state(Some(CameraStatus::Inactive), None));
        assert_eq!(frame, StreamFrame::Unavailable(NOT_ACTIVE));
    }

    #[test]
    fn test_failed_check() {
        let frame = StreamFrame::from_poll(URL, &state(None, Some("Failed to check camera status")));
        assert_eq!(frame, StreamFrame::Unavailable(CHECK_FAILED));
        assert_eq!(
            StreamFrame::from_poll(URL, &PollState::default()),
            StreamFrame::Connecting
        );
    }

    #[test]
    fn test_header() {
        let camera = Camera::new(uuid::Uuid::now_v7(), "Gate", "10.0.0.5", 8080);
        assert_eq!(render_header(&camera), "Gate - Live View\nIP: 10.0.0.5:8080");
    }
}
